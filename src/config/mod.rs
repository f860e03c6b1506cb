pub mod activities;
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{
        validate_non_empty_string, validate_output_formats, validate_path, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "pref-assign")]
    #[command(about = "Assign participants to capacity-limited activities by ranked preference")]
    pub struct CliConfig {
        /// CSV file with one row per participant
        #[arg(short, long)]
        pub input: String,

        /// Activity capacities (.json object or .toml [[activity]] tables)
        #[arg(short, long)]
        pub activities: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, default_value = "StudentEmail")]
        pub participant_column: String,

        #[arg(long, default_value = "Preferences")]
        pub preferences_column: String,

        /// Output formats: csv, json
        #[arg(long, value_delimiter = ',', default_value = "csv")]
        pub formats: Vec<String>,

        /// Also bundle the outputs into this ZIP file
        #[arg(long)]
        pub archive: Option<String>,

        #[arg(long, help = "Reject preference tokens that match no activity")]
        pub strict: bool,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Log CPU and memory usage per phase")]
        pub monitor: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,
    }

    impl ConfigProvider for CliConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn participant_column(&self) -> &str {
            &self.participant_column
        }

        fn preferences_column(&self) -> &str {
            &self.preferences_column
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn archive_name(&self) -> Option<&str> {
            self.archive.as_deref()
        }

        fn strict_preferences(&self) -> bool {
            self.strict
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("input", &self.input)?;
            validate_path("activities", &self.activities)?;
            validate_path("output_path", &self.output_path)?;
            validate_non_empty_string("participant_column", &self.participant_column)?;
            validate_non_empty_string("preferences_column", &self.preferences_column)?;
            validate_output_formats("formats", &self.formats)?;
            if let Some(archive) = &self.archive {
                validate_path("archive", archive)?;
            }
            Ok(())
        }
    }

}
