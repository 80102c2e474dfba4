use clap::{Parser, Subcommand};
use serde_json::Value;

use iiko_gateway::translator::{LogicalRequest, RequestFields};

#[derive(Parser)]
#[command(name = "iiko-cli")]
#[command(about = "Command-line client for the iiko API gateway", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Upstream access token, forwarded as a bearer credential.
    #[arg(short, long, env = "IIKO_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange an API login for an access token
    AccessToken {
        #[arg(long)]
        api_login: String,
    },
    /// List organizations
    Organizations {
        #[arg(long)]
        additional_info: bool,
        #[arg(long)]
        include_disabled: bool,
    },
    /// Fetch an organization's menu
    Menu {
        #[arg(long)]
        organization_id: String,
        #[arg(long)]
        start_revision: Option<i64>,
    },
    /// List terminal groups
    TerminalGroups {
        /// Organization ID (repeatable)
        #[arg(long = "organization-id")]
        organization_ids: Vec<String>,
        #[arg(long)]
        include_disabled: bool,
    },
    /// List delivery order types
    OrderTypes {
        /// Organization ID (repeatable)
        #[arg(long = "organization-id")]
        organization_ids: Vec<String>,
    },
    /// List payment types
    PaymentTypes {
        /// Organization ID (repeatable)
        #[arg(long = "organization-id")]
        organization_ids: Vec<String>,
    },
}

impl Commands {
    fn into_request(self, token: Option<String>) -> LogicalRequest {
        let mut body = RequestFields {
            token: token.map(Value::String),
            ..Default::default()
        };

        let endpoint = match self {
            Commands::AccessToken { api_login } => {
                body.api_login = Some(api_login);
                "/api/1/access_token"
            }
            Commands::Organizations {
                additional_info,
                include_disabled,
            } => {
                body.return_additional_info = Some(additional_info);
                body.include_disabled = Some(include_disabled);
                "/api/1/organizations"
            }
            Commands::Menu {
                organization_id,
                start_revision,
            } => {
                body.organization_id = Some(organization_id);
                body.start_revision = start_revision;
                "/api/2/menu"
            }
            Commands::TerminalGroups {
                organization_ids,
                include_disabled,
            } => {
                body.organization_ids = Some(to_values(organization_ids));
                body.include_disabled = Some(include_disabled);
                "/api/1/terminal_groups"
            }
            Commands::OrderTypes { organization_ids } => {
                body.organization_ids = Some(to_values(organization_ids));
                "/api/1/deliveries/order_types"
            }
            Commands::PaymentTypes { organization_ids } => {
                body.organization_ids = Some(to_values(organization_ids));
                "/api/1/payment_types"
            }
        };

        LogicalRequest {
            endpoint: endpoint.to_string(),
            body,
        }
    }
}

fn to_values(ids: Vec<String>) -> Vec<Value> {
    ids.into_iter().map(Value::String).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = cli.command.into_request(cli.token);
    let res = client
        .post(format!("{}/api", cli.url.trim_end_matches('/')))
        .json(&request)
        .send()
        .await?;

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if status.is_success() {
        Ok(())
    } else {
        Err(format!("request failed with status {}", status).into())
    }
}
