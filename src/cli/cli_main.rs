use crate::Reactions::reaction_result::ReactionResult;
use crate::Reactions::simulation::Simulation;
use crate::Substances::chemicals::{Chemical, PhysicalState, Portion, Reaction};
use crate::Substances::reference_data::{REACTION_CATEGORIES, ReferenceData};
use crate::library_manager::{with_library_manager, with_library_manager_mut};
use prettytable::{Table, row};
use std::collections::HashMap;
use std::io::{self, Write};
use std::thread;
use thiserror::Error;

/// One parsed menu line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ListChemicals {
        term: String,
        state: Option<PhysicalState>,
    },
    ListReactions {
        category: Option<String>,
        term: String,
    },
    SelectReaction(String),
    FreeMode,
    Add { id: String, quantity: Option<f64> },
    SetQuantity { id: String, quantity: f64 },
    Remove(String),
    Clear,
    SetTemperature(f64),
    SetPressure(f64),
    Start,
    Stop,
    ShowResult,
    Library(LibraryAction),
    Exit,
}

/// Dataset paths kept by the library manager
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryAction {
    Show,
    Chemicals(String),
    Reactions(String),
    Both { chemicals: String, reactions: String },
    Reset,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Empty input")]
    Empty,
    #[error("Invalid choice '{0}'. Please try again.")]
    UnknownChoice(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a number")]
    BadNumber(String),
}

/// Parses a menu line: the option number (or its keyword) followed by arguments,
/// e.g. `5 hcl 2.5` or `add hcl 2.5`.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(choice) = parts.next() else {
        return Err(CommandError::Empty);
    };
    let args: Vec<&str> = parts.collect();
    // file paths keep their case, ids do not
    let raw = |i: usize, what: &'static str| {
        args.get(i)
            .map(|s| s.to_string())
            .ok_or(CommandError::MissingArgument(what))
    };
    let id = |i: usize, what: &'static str| raw(i, what).map(|s| s.to_lowercase());
    let command = match choice.to_lowercase().as_str() {
        "1" | "chemicals" => parse_chemical_search(&args),
        "2" | "reactions" => parse_reaction_search(&args),
        "3" | "select" => Command::SelectReaction(id(0, "reaction id")?),
        "4" | "free" => Command::FreeMode,
        "5" | "add" => Command::Add {
            id: id(0, "chemical id")?,
            quantity: args.get(1).map(|q| number(q)).transpose()?,
        },
        "6" | "remove" => Command::Remove(id(0, "chemical id")?),
        "7" | "clear" => Command::Clear,
        "8" | "temperature" => Command::SetTemperature(number(&id(0, "temperature, °C")?)?),
        "9" | "pressure" => Command::SetPressure(number(&id(0, "pressure, atm")?)?),
        "10" | "start" => Command::Start,
        "11" | "stop" => Command::Stop,
        "12" | "result" => Command::ShowResult,
        "13" | "quantity" => Command::SetQuantity {
            id: id(0, "chemical id")?,
            quantity: number(&id(1, "quantity, mL")?)?,
        },
        "14" | "library" => {
            let action = match args.first().map(|a| a.to_lowercase()).as_deref() {
                None => LibraryAction::Show,
                Some("chemicals") => LibraryAction::Chemicals(raw(1, "chemicals file")?),
                Some("reactions") => LibraryAction::Reactions(raw(1, "reactions file")?),
                Some("both") => LibraryAction::Both {
                    chemicals: raw(1, "chemicals file")?,
                    reactions: raw(2, "reactions file")?,
                },
                Some("reset") => LibraryAction::Reset,
                Some(other) => return Err(CommandError::UnknownChoice(other.to_string())),
            };
            Command::Library(action)
        }
        "0" | "exit" | "quit" => Command::Exit,
        other => return Err(CommandError::UnknownChoice(other.to_string())),
    };
    Ok(command)
}

/// `[term...] [state]`: a trailing state word filters by state, the rest is the term
fn parse_chemical_search(args: &[&str]) -> Command {
    let (state, words) = match args.split_last() {
        Some((last, rest)) => match PhysicalState::from_name(last) {
            Some(state) => (Some(state), rest),
            None => (None, args),
        },
        None => (None, args),
    };
    Command::ListChemicals {
        term: words.join(" "),
        state,
    }
}

/// `[category] [term...]`: a leading reaction family narrows the list, the rest is the term
fn parse_reaction_search(args: &[&str]) -> Command {
    let (category, words) = match args.split_first() {
        Some((first, rest)) => {
            let first = first.to_lowercase();
            if REACTION_CATEGORIES.contains(&first.as_str()) {
                (Some(first), rest)
            } else {
                (None, args)
            }
        }
        None => (None, args),
    };
    Command::ListReactions {
        category,
        term: words.join(" "),
    }
}

fn number(text: &str) -> Result<f64, CommandError> {
    text.parse::<f64>()
        .map_err(|_| CommandError::BadNumber(text.to_string()))
}

pub fn run_interactive_menu(sim: &mut Simulation) {
    loop {
        show_main_menu(sim);
        let Some(line) = get_user_input() else {
            break;
        };
        match parse_command(&line) {
            Ok(Command::Exit) => {
                println!("Goodbye!");
                break;
            }
            Ok(command) => execute(sim, command),
            Err(CommandError::Empty) => {}
            Err(e) => println!("\x1b[31m{}\x1b[0m", e),
        }
    }
}

/// Applies a command to the session and prints what changed
pub fn execute(sim: &mut Simulation, command: Command) {
    let outcome = match command {
        Command::ListChemicals { term, state } => {
            let found = sim.data().search_chemicals(&term, state);
            if found.is_empty() {
                println!("No chemicals match '{}'", term);
            } else {
                chemicals_table(&found).printstd();
            }
            Ok(())
        }
        Command::ListReactions { category, term } => {
            let found = sim.data().search_reactions(category.as_deref(), &term);
            if found.is_empty() {
                println!("No reactions match '{}'", term);
            } else {
                reactions_table(&found).printstd();
            }
            Ok(())
        }
        Command::SelectReaction(id) => sim.select_reaction(&id).map(|r| {
            println!("{}: {}", r.name, r.description);
            println!("Reactants: {}", r.reactants.join(", "));
        }),
        Command::FreeMode => {
            sim.deselect_reaction();
            Ok(())
        }
        Command::Add { id, quantity } => {
            let added = match quantity {
                Some(q) => sim.add_chemical_with_quantity(&id, q),
                None => sim.add_chemical(&id),
            };
            added.map(|_| {
                selection_table(sim.selection()).printstd();
            })
        }
        Command::SetQuantity { id, quantity } => sim.set_quantity(&id, quantity).map(|_| {
            selection_table(sim.selection()).printstd();
        }),
        Command::Remove(id) => sim.remove_chemical(&id).map(|_| {
            selection_table(sim.selection()).printstd();
        }),
        Command::Clear => {
            sim.clear_test_tube();
            Ok(())
        }
        Command::SetTemperature(t) => {
            println!("Temperature: {:.1} °C", sim.set_temperature(t));
            Ok(())
        }
        Command::SetPressure(p) => {
            println!("Pressure: {:.2} atm", sim.set_pressure(p));
            Ok(())
        }
        Command::Start => sim.start_reaction().map(|_| {
            let delay = sim.remaining_delay().unwrap_or_default();
            println!("Reacting...");
            thread::sleep(delay);
            if let Some(result) = sim.advance(delay) {
                result_table(result).printstd();
            }
        }),
        Command::Stop => {
            sim.stop_reaction();
            Ok(())
        }
        Command::ShowResult => {
            match sim.result() {
                Some(result) => {
                    result_table(result).printstd();
                }
                None => println!("No reaction result yet"),
            }
            Ok(())
        }
        Command::Library(action) => {
            if let Err(e) = switch_library(sim, action) {
                println!("\x1b[31m{}\x1b[0m", e);
            }
            Ok(())
        }
        Command::Exit => Ok(()),
    };
    if let Err(e) = outcome {
        println!("\x1b[31m{}\x1b[0m", e);
    }
}

/// Updates the dataset paths and reloads the session data from them
fn switch_library(sim: &mut Simulation, action: LibraryAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LibraryAction::Show => {
            with_library_manager(|manager| {
                println!("Chemicals: {}", manager.chemical_base_path());
                println!("Reactions: {}", manager.reaction_base_path());
                println!("Config file: {}", manager.config_file());
            });
            return Ok(());
        }
        LibraryAction::Chemicals(path) => with_library_manager_mut(|m| m.set_chemical_base(&path))?,
        LibraryAction::Reactions(path) => with_library_manager_mut(|m| m.set_reaction_base(&path))?,
        LibraryAction::Both { chemicals, reactions } => with_library_manager_mut(|m| {
            m.update_libraries(HashMap::from([
                ("chemical_base", chemicals.as_str()),
                ("reaction_base", reactions.as_str()),
            ]))
        })?,
        LibraryAction::Reset => with_library_manager_mut(|m| m.reset_to_defaults())?,
    }
    let config = with_library_manager(|manager| manager.get_config().clone());
    let data = ReferenceData::load(&config)?;
    println!(
        "Loaded {} chemicals and {} reactions",
        data.chemicals().len(),
        data.reactions().len()
    );
    sim.replace_data(data);
    Ok(())
}

pub fn chemicals_table(chemicals: &[&Chemical]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["id", "Name", "Formula", "State", "Density, g/mL", "Color"]);
    for chemical in chemicals {
        table.add_row(row![
            chemical.id,
            chemical.name,
            chemical.display_formula(),
            chemical.state.as_str(),
            format!("{:.3}", chemical.density),
            chemical.color.to_string()
        ]);
    }
    table
}

pub fn reactions_table(reactions: &[&Reaction]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["id", "Name", "Reactants", "Products", "T, °C"]);
    for reaction in reactions {
        table.add_row(row![
            reaction.id,
            reaction.name,
            reaction.reactants.join(" + "),
            reaction.products.join(" + "),
            format!("{}", reaction.conditions.temperature)
        ]);
    }
    table
}

pub fn selection_table(selection: &[Portion]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Chemical", "Quantity, mL"]);
    for portion in selection {
        table.add_row(row![portion.chemical.to_string(), format!("{:.2}", portion.quantity)]);
    }
    table
}

pub fn result_table(result: &ReactionResult) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Parameter", "Value"]);
    table.add_row(row!["Formula", result.formula]);
    table.add_row(row!["Color", result.color.to_string()]);
    table.add_row(row![
        "Temperature",
        format!("{:.1} °C ({:?})", result.temperature, result.temperature_change)
    ]);
    table.add_row(row!["Effects", result.active_effects().join(", ")]);
    if let Some(glow) = result.glow_color {
        table.add_row(row!["Glow color", glow.to_string()]);
    }
    table.add_row(row!["Intensity", format!("{:.2}", result.intensity)]);
    table.add_row(row!["Sound", format!("{:?}", result.sound_effect)]);
    table
}

/* colors
Blue (\x1b[34m) - header and session status
Yellow (\x1b[33m) - menu options
Cyan (\x1b[36m) - "Enter your choice:" prompt
Red (\x1b[31m) - rejected commands
*/
fn show_main_menu(sim: &Simulation) {
    let mode = match sim.selected_reaction() {
        Some(reaction) => format!("reaction '{}'", reaction.id),
        None => "free mode".to_string(),
    };
    println!(
        "\x1b[34m\n ChemLab: virtual test tube \n {} | {:.1} °C | {:.2} atm | {} portion(s) \x1b[0m",
        mode,
        sim.temperature(),
        sim.pressure(),
        sim.selection().len()
    );
    println!("\x1b[33m1. List chemicals [search] [solid|liquid|gas]\x1b[0m");
    println!("\x1b[33m2. List reactions [category] [search]\x1b[0m");
    println!("\x1b[33m3. Select reaction <id>\x1b[0m");
    println!("\x1b[33m4. Free mode\x1b[0m");
    println!("\x1b[33m5. Add chemical <id> [mL]\x1b[0m");
    println!("\x1b[33m6. Remove chemical <id>\x1b[0m");
    println!("\x1b[33m7. Clear test tube\x1b[0m");
    println!("\x1b[33m8. Set temperature <°C>\x1b[0m");
    println!("\x1b[33m9. Set pressure <atm>\x1b[0m");
    println!("\x1b[33m10. Start reaction\x1b[0m");
    println!("\x1b[33m11. Stop reaction\x1b[0m");
    println!("\x1b[33m12. Show result\x1b[0m");
    println!("\x1b[33m13. Set quantity <id> <mL>\x1b[0m");
    println!("\x1b[33m14. Library [chemicals <file> | reactions <file> | both <file> <file> | reset]\x1b[0m");
    println!("\x1b[33m0. Exit\x1b[0m");
    print!("\x1b[36mEnter your choice: \x1b[0m");
    let _ = io::stdout().flush();
}

/// None at end of input
fn get_user_input() -> Option<String> {
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input),
    }
}
