pub mod github;
pub mod local;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, CourseArgs};

#[cfg(feature = "cli")]
mod cli {
    use super::toml_config::{AppConfig, Backend};
    use crate::domain::model::CourseInput;
    use crate::utils::error::Result;
    use clap::{Args, Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "grade-ledger")]
    #[command(about = "Track course records and grade-point averages")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Student whose records are used
        #[arg(short, long)]
        pub student: Option<String>,

        /// Override the storage backend from the configuration
        #[arg(long, value_enum)]
        pub backend: Option<Backend>,

        /// Directory of the local snapshot file
        #[arg(long)]
        pub data_dir: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Record a new course attempt
        Add(CourseArgs),
        /// Replace the first record with the same code and term
        Update(CourseArgs),
        /// Remove every record with the given code and term
        Delete {
            #[arg(long)]
            code: String,
            #[arg(long)]
            term: String,
        },
        /// Show records grouped by term
        List,
        /// Show term and cumulative GPA
        Summary,
        /// Write the records to a CSV file
        Export {
            #[arg(short, long)]
            output: String,
        },
        /// List the students stored in the snapshot
        Students,
    }

    #[derive(Debug, Clone, Args)]
    pub struct CourseArgs {
        #[arg(long)]
        pub code: String,
        #[arg(long, default_value = "")]
        pub name: String,
        #[arg(long)]
        pub term: String,
        #[arg(long)]
        pub credits: String,
        /// Score on the 10-point scale
        #[arg(long)]
        pub score: String,
    }

    impl From<&CourseArgs> for CourseInput {
        fn from(args: &CourseArgs) -> Self {
            CourseInput::new(
                args.code.clone(),
                args.name.clone(),
                args.term.clone(),
                args.credits.clone(),
                args.score.clone(),
            )
        }
    }

    impl CliConfig {
        /// Configuration file (or the hosting secrets) with command-line overrides applied.
        pub fn resolve(&self) -> Result<AppConfig> {
            let mut config = match &self.config {
                Some(path) => AppConfig::from_file(path)?,
                None => AppConfig::from_env(),
            };

            if let Some(backend) = self.backend {
                config.store.backend = Some(backend);
            }
            if let Some(dir) = &self.data_dir {
                config.store.directory = Some(dir.clone());
            }
            if let Some(student) = &self.student {
                config.student.default_id = Some(student.clone());
            }
            Ok(config)
        }
    }

}
