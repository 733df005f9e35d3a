use anyhow::{bail, Context, Result};
use tracing::info;

use crate::{
    boundary::{AdminLevel, AdminUnit, HttpBoundaryClient},
    cascade::{CascadeController, CascadeState},
    cli::{RenderArgs, SelectArgs, TalukasArgs, VillagesArgs},
    config::Config,
    error::Warning,
    shell::{AppShell, ShellEvent},
};

pub fn districts(config: &Config) -> Result<()> {
    let client = HttpBoundaryClient::new(&config.service)?;
    let mut warnings = Vec::new();
    let units = client.fetch_districts(&mut warnings);
    print_warnings(&warnings);
    print_units(&units);
    Ok(())
}

pub fn talukas(config: &Config, args: &TalukasArgs) -> Result<()> {
    let client = HttpBoundaryClient::new(&config.service)?;
    let mut warnings = Vec::new();
    let units = client.fetch_talukas(&args.district, &mut warnings);
    print_warnings(&warnings);
    print_units(&units);
    Ok(())
}

pub fn villages(config: &Config, args: &VillagesArgs) -> Result<()> {
    let client = HttpBoundaryClient::new(&config.service)?;
    let mut warnings = Vec::new();
    let units = client.fetch_villages(&args.taluka, &mut warnings);
    print_warnings(&warnings);
    print_units(&units);
    Ok(())
}

pub fn select(config: &Config, args: &SelectArgs) -> Result<()> {
    let client = HttpBoundaryClient::new(&config.service)?;
    info!(base_url = client.base_url(), "[select] loading districts");
    let mut shell = AppShell::new(config, &client);

    let steps = [
        (AdminLevel::District, Some(&args.district)),
        (AdminLevel::Taluka, args.taluka.as_ref()),
        (AdminLevel::Village, args.village.as_ref()),
    ];
    for (level, key) in steps {
        let Some(key) = key else { break };
        let code = resolve(shell.cascade().state(), level, key)?;
        let event = match level {
            AdminLevel::District => ShellEvent::SelectDistrict(Some(code)),
            AdminLevel::Taluka => ShellEvent::SelectTaluka(Some(code)),
            AdminLevel::Village => ShellEvent::SelectVillage(Some(code)),
        };
        shell.handle(event, &client)?;
    }

    print_warnings(&shell.take_warnings());
    print_selection(shell.cascade().state());
    Ok(())
}

pub fn render(config: &Config, args: &RenderArgs) -> Result<()> {
    let mut config = config.clone();
    if args.width.is_some() {
        config.map.width = args.width;
    }
    if let Some(height) = args.height {
        config.map.height = height;
    }
    config.validate()?;

    let mut shell = AppShell::with_controller(&config, CascadeController::empty());

    if let Some(path) = &args.aoi {
        let bytes = std::fs::read(path).with_context(|| format!("[render] read {}", path.display()))?;
        let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let aoi = shell.upload(&file_name, &bytes)
            .with_context(|| format!("[render] load AOI from {}", path.display()))?;
        info!(kind = aoi.type_name(), "[render] AOI loaded");
    }

    shell.write_html(&args.output, args.force)?;
    println!("Wrote map to {}", args.output.display());
    Ok(())
}

/// Match `key` against codes first, then display names.
fn resolve(state: &CascadeState, level: AdminLevel, key: &str) -> Result<String> {
    if let Some(unit) = state.find(level, key).or_else(|| state.find_by_name(level, key)) {
        return Ok(unit.code.clone());
    }
    let options = state.options(level);
    if options.is_empty() {
        bail!("No {} available to select {key:?} from", level.plural());
    }
    let names: Vec<&str> = options.iter().map(|u| u.name.as_str()).collect();
    bail!("Unknown {level} {key:?}; expected one of: {}", names.join(", "))
}

fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

fn print_units(units: &[AdminUnit]) {
    for unit in units {
        let b = &unit.bbox;
        println!("{}\t{}\t[{}, {}, {}, {}]", unit.code, unit.name, b.xmin, b.ymin, b.xmax, b.ymax);
    }
}

fn print_selection(state: &CascadeState) {
    for level in AdminLevel::ALL {
        match state.selected(level) {
            Some(unit) => println!("{level}:\t{unit}"),
            None => println!("{level}:\t-"),
        }
    }
    if let Some(child) = state.depth().and_then(|level| level.child()) {
        println!("{}:\t{} options", child.plural(), state.options(child).len());
    }
    if let Some(b) = state.focus_bounds() {
        println!("bounds:\t[{}, {}, {}, {}]", b.xmin, b.ymin, b.xmax, b.ymax);
    }
}
