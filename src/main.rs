use ChemLab::Reactions::simulation::Simulation;
use ChemLab::Substances::reference_data::ReferenceData;
use ChemLab::cli::cli_main::run_interactive_menu;
use ChemLab::library_manager::with_library_manager;
use ChemLab::settings::SimulationSettings;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const SETTINGS_FILE: &str = "simulation_settings.json";

pub fn main() {
    let settings = SimulationSettings::load(SETTINGS_FILE);
    if let Err(e) = TermLogger::init(
        settings.level_filter(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("logger is not available: {}", e);
    }

    let config = with_library_manager(|manager| manager.get_config().clone());
    let data = match ReferenceData::load(&config) {
        Ok(data) => data,
        Err(e) => {
            log::error!("failed to load reference data: {}", e);
            std::process::exit(1);
        }
    };
    let mut sim = Simulation::new(data, settings);
    run_interactive_menu(&mut sim);
}
