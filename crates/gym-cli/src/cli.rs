use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Password, Text};

use gym_data::MemberFilter;
use gym_remote::connection::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use gym_remote::ConnectionConfig;
use gym_roster::{Credentials, MemberService, Roster, DEFAULT_PASSWORD, DEFAULT_USERNAME};

use crate::commands::{
    AddMember,
    DeleteMember,
    ExportMembers,
    ListMembers,
    ShowMember,
    UpdateMember,
};

#[derive(Parser, Debug)]
#[clap(name = "gym", version=env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Base url of the member service
    #[clap(long, env = "GYM_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[clap(long, env = "GYM_TIMEOUT", default_value_t = DEFAULT_TIMEOUT)]
    pub timeout: u64,

    /// Operator login, asked for when missing
    #[clap(short, long, env = "GYM_USERNAME")]
    pub username: Option<String>,
    #[clap(short, long, env = "GYM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Credentials the operator login is checked against
    #[clap(long, env = "GYM_ADMIN_USERNAME", default_value = DEFAULT_USERNAME)]
    pub admin_username: String,
    #[clap(
        long,
        env = "GYM_ADMIN_PASSWORD",
        default_value = DEFAULT_PASSWORD,
        hide_default_value = true,
        hide_env_values = true
    )]
    pub admin_password: String,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.api_url.clone()).with_timeout(self.timeout)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.admin_username.clone(), self.admin_password.clone())
    }

    /// Username and password of the operator, prompting
    /// for whatever was not given.
    pub fn operator_login(&self) -> Result<(String, String)> {
        let username = match &self.username {
            Some(username) => username.clone(),
            None => Text::new("Username:").prompt()?,
        };
        let password = match &self.password {
            Some(password) => password.clone(),
            None => Password::new("Password:").without_confirmation().prompt()?,
        };
        Ok((username, password))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List members
    #[clap(name = "list")]
    List(ListMembers),
    /// Show a member
    #[clap(name = "show")]
    Show(ShowMember),
    /// Add a member
    #[clap(name = "add")]
    Add(AddMember),
    /// Update a member
    #[clap(name = "update")]
    Update(UpdateMember),
    /// Delete a member
    #[clap(name = "delete")]
    Delete(DeleteMember),
    /// Export members as CSV
    #[clap(name = "export")]
    Export(ExportMembers),
}

impl Command {
    /// The status the member service should scope the roster to
    pub fn server_filter(&self) -> MemberFilter {
        let status = match self {
            Command::List(cmd) => cmd.server_status,
            Command::Export(cmd) => cmd.server_status,
            _ => None,
        };
        MemberFilter { status }
    }

    pub async fn run<DB: MemberService>(self, roster: &Roster<DB>) -> Result<()> {
        match self {
            Command::List(cmd) => cmd.run(roster).await,
            Command::Show(cmd) => cmd.run(roster).await,
            Command::Add(cmd) => cmd.run(roster).await,
            Command::Update(cmd) => cmd.run(roster).await,
            Command::Delete(cmd) => cmd.run(roster).await,
            Command::Export(cmd) => cmd.run(roster).await,
        }
    }
}
