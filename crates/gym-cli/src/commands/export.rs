use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;

use gym_data::{datetime, MembershipStatus, StatusFilter};
use gym_export::{export_file, ExportOptions};
use gym_roster::{MemberService, Roster, ViewQuery};

#[derive(Args, Debug)]
pub struct ExportMembers {
    /// Write the CSV to this file
    #[clap(long)]
    pub file: PathBuf,
    /// Search in name, email and phone
    #[clap(short, long, default_value = "")]
    pub search: String,
    /// all, active or expired
    #[clap(short, long, default_value_t = StatusFilter::All)]
    pub filter: StatusFilter,
    /// Let the member service return only active or expired members
    #[clap(long)]
    pub server_status: Option<MembershipStatus>,
    /// strftime format of the membership dates
    #[clap(long, default_value = "%Y-%m-%d")]
    pub date_format: String,
    #[clap(long, default_value_t = ',')]
    pub delimiter: char,
}

impl ExportMembers {
    /// Run the command and export the listed members
    pub async fn run<DB: MemberService>(self, roster: &Roster<DB>) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(anyhow!("delimiter {:?} is not an ASCII character", self.delimiter));
        }
        let options = ExportOptions {
            date_format: self.date_format,
            delimiter: self.delimiter as u8,
        };

        let snapshot = roster.snapshot().await;
        let query = ViewQuery::new(self.search, self.filter);
        let rows = snapshot.project(&query, &datetime::now());

        let count = export_file(&self.file, &rows, &options)?;
        println!("Exported {} members to {}.", count, self.file.display());
        Ok(())
    }
}
