use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// AOI picker CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "ndvi-aoi", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// TOML config file (defaults to $NDVI_AOI_CONFIG, then built-in defaults)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List districts
    Districts,

    /// List talukas of a district
    Talukas(TalukasArgs),

    /// List villages of a taluka
    Villages(VillagesArgs),

    /// Walk the district -> taluka -> village cascade and print the selection
    Select(SelectArgs),

    /// Write a Leaflet map page with the reference overlay and an optional AOI
    Render(RenderArgs),
}

#[derive(Args, Debug)]
pub struct TalukasArgs {
    /// District code, e.g. 01
    pub district: String,
}

#[derive(Args, Debug)]
pub struct VillagesArgs {
    /// Taluka code
    pub taluka: String,
}

#[derive(Args, Debug)]
pub struct SelectArgs {
    /// District code or name
    #[arg(long)]
    pub district: String,

    /// Taluka code or name (within the district)
    #[arg(long)]
    pub taluka: Option<String>,

    /// Village code or name (within the taluka)
    #[arg(long, requires = "taluka")]
    pub village: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// AOI file to show on the map (.geojson)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub aoi: Option<PathBuf>,

    /// Output HTML file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Map width in pixels (fills the page when omitted)
    #[arg(long)]
    pub width: Option<u32>,

    /// Map height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_select_with_global_flags() {
        let cli = Cli::try_parse_from([
            "ndvi-aoi", "select", "--district", "Pune", "--taluka", "Haveli", "-vv", "--config", "aoi.toml",
        ]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("aoi.toml")));
        match cli.command {
            Commands::Select(args) => {
                assert_eq!(args.district, "Pune");
                assert_eq!(args.taluka.as_deref(), Some("Haveli"));
                assert_eq!(args.village, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn village_requires_taluka() {
        assert!(Cli::try_parse_from(["ndvi-aoi", "select", "--district", "01", "--village", "x"]).is_err());
    }

    #[test]
    fn render_requires_output() {
        assert!(Cli::try_parse_from(["ndvi-aoi", "render"]).is_err());
        let cli = Cli::try_parse_from(["ndvi-aoi", "render", "-o", "map.html", "--height", "500"]).unwrap();
        match cli.command {
            Commands::Render(args) => {
                assert_eq!(args.output, PathBuf::from("map.html"));
                assert_eq!(args.height, Some(500));
                assert!(!args.force);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_schema_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
