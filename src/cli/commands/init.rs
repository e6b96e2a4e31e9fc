//! Init command implementation
//!
//! Writes a starter configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "spo-exporter.toml")]
    pub output: String,

    /// Include an example XML import mapping
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

const BASE_CONFIG: &str = r#"# SPO Exporter configuration
# Every setting below shows its default; delete what you do not change.

[application]
log_level = "info"

[database]
server_name = "cmogreport.cmog.org"   # env SERVER_NAME
database_name = "Training_Portal"     # env DATABASE_NAME
port = 5432
username = "spo_exporter"             # env SPO_DATABASE_USERNAME
# password = "${SPO_DATABASE_PASSWORD}"
ssl_mode = "prefer"                   # disable | prefer | require
max_connections = 4
connection_timeout_seconds = 30
statement_timeout_seconds = 300

[export]
output_root = "."                     # env OUTPUT_ROOT
atomic_writes = true

[catalog]
assets_query = 'select * from "REPORT_Extract_Courses_For_SharePoint"()'
technologies_query = 'select * from "SPO_Technologies"'
categories_query = 'select * from "SPO_Categories"'
audiences_query = 'select * from "SPO_Audiences"'
levels_query = 'select * from "SPO_Levels"'
status_tags_query = 'select * from "SPO_StatusTags"'
sources = ["Litmos", "Wombat"]

[server]
bind_address = "0.0.0.0"
port = 8080
url_prefix = ""                       # env API_URL_PREFIX
namespace = "api"                     # route is {url_prefix}/{namespace}/execute

[alerting]
enabled = false
smtp_server_name = "smtp.cmog.org"    # env SMTP_SERVER_NAME
smtp_port = 25
from = "noreply@cmog.org"
to = []
subject = "[ERROR] Litmos-SPO Export"

[logging]
local_enabled = false
local_path = "/var/log/spo-exporter"
local_rotation = "daily"              # daily | hourly | never
"#;

const IMPORT_EXAMPLE: &str = r#"
# XML record batches: spo-exporter import --file users.xml --table Litmos_Users
[[import.tables]]
table = "Litmos_Users"
record_element = "User"
columns = [
    { type = "value", field = "Id" },
    { type = "string", field = "FirstName" },
    { type = "string", field = "LastName" },
    { type = "username", field = "Email" },
    { type = "bit", field = "Active" },
    { type = "constant", value = "'Litmos'" },
]
"#;

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::generate_config(self.with_examples)) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Put SPO_DATABASE_PASSWORD in the environment or a .env file");
                println!("  3. Validate configuration: spo-exporter validate-config");
                println!("  4. Start the trigger: spo-exporter serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate the configuration text
    fn generate_config(with_examples: bool) -> String {
        let mut config = BASE_CONFIG.to_string();
        if with_examples {
            config.push_str(IMPORT_EXAMPLE);
        }
        config
    }
}
