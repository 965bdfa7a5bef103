/// RGB colours: parsing from hex text, display and serde
///
///  # Examples
/// ```
/// use ChemLab::Substances::color::Color;
/// let color: Color = "#1E90FF".parse().unwrap();
/// assert_eq!(color, Color::new(0x1E, 0x90, 0xFF));
/// assert_eq!(color.to_string(), "#1E90FF");
/// ```
pub mod color;
/// eng
/// Records of the reference dataset: chemicals (with category tags and flame tints),
/// predefined reactions with their conditions and expected effects, and portions
/// of chemicals poured into the test tube
pub mod chemicals;
/// Id-indexed store of chemicals and reactions, bundled or loaded from JSON files
///
///  # Examples
/// ```
/// use ChemLab::Substances::reference_data::ReferenceData;
/// let data = ReferenceData::builtin().unwrap();
/// let hcl = data.chemical("hcl").unwrap();
/// println!("{} density {}", hcl, hcl.density);
/// // unknown ids degrade to the upper-cased id
/// assert_eq!(data.formula_of("pbno32"), "PBNO32");
/// ```
pub mod reference_data;
