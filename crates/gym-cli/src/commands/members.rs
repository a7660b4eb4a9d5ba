use anyhow::Result;
use chrono::Local;
use clap::Args;
use inquire::Confirm;
use tracing::warn;

use gym_data::{datetime, Member, MemberDraft, MemberId, MembershipStatus, RosterError, StatusFilter};
use gym_roster::{MemberService, Roster, ViewQuery};

use crate::formatting::PrintFormatted;

#[derive(Args, Debug)]
pub struct ListMembers {
    /// Search in name, email and phone
    #[clap(short, long, default_value = "")]
    pub search: String,
    /// all, active or expired
    #[clap(short, long, default_value_t = StatusFilter::All)]
    pub filter: StatusFilter,
    /// Let the member service return only active or expired members
    #[clap(long)]
    pub server_status: Option<MembershipStatus>,
}

impl ListMembers {
    pub fn view_query(&self) -> ViewQuery {
        ViewQuery::new(self.search.clone(), self.filter)
    }

    /// Run the command and list members
    pub async fn run<DB: MemberService>(self, roster: &Roster<DB>) -> Result<()> {
        let snapshot = roster.snapshot().await;
        let rows = snapshot.project(&self.view_query(), &datetime::now());

        println!("{} of {} members.", rows.len(), snapshot.len());
        rows.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowMember {
    #[clap(short, long)]
    pub id: MemberId,
}

impl ShowMember {
    /// Run the command and show a member
    pub async fn run<DB: MemberService>(self, roster: &Roster<DB>) -> Result<()> {
        let snapshot = roster.snapshot().await;
        let member = snapshot
            .get(&self.id)
            .ok_or_else(|| RosterError::NotFound(self.id.clone()))?;
        println!();
        member.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddMember {
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long)]
    pub email: String,
    #[clap(short, long)]
    pub phone: String,
    /// First day of the membership, today if not given
    #[clap(long)]
    pub start: Option<String>,
    /// Last day of the membership
    #[clap(long)]
    pub end: String,
}

impl AddMember {
    /// Run the command and add a member
    pub async fn run<DB: MemberService>(self, roster: &Roster<DB>) -> Result<()> {
        let membership_start = self
            .start
            .unwrap_or_else(|| Local::now().date_naive().to_string());
        let mut draft = MemberDraft {
            name: self.name,
            email: self.email,
            phone: self.phone,
            membership_start,
            membership_end: self.end,
        };

        println!();
        draft.print_formatted();
        println!();

        roster.create(&mut draft).await?;
        println!(
            "Member added, {} members on the roster.",
            roster.snapshot().await.len()
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateMember {
    #[clap(short, long)]
    pub id: MemberId,
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub email: Option<String>,
    #[clap(short, long)]
    pub phone: Option<String>,
    #[clap(long)]
    pub start: Option<String>,
    #[clap(long)]
    pub end: Option<String>,
}

impl UpdateMember {
    /// Run command and update a member
    pub async fn run<DB: MemberService>(self, roster: &Roster<DB>) -> Result<()> {
        let draft = roster.begin_edit(&self.id).await?;
        let mut update = draft.clone();

        if let Some(name) = self.name {
            update.name = name;
        }
        if let Some(email) = self.email {
            update.email = email;
        }
        if let Some(phone) = self.phone {
            update.phone = phone;
        }
        if let Some(start) = self.start {
            update.membership_start = start;
        }
        if let Some(end) = self.end {
            update.membership_end = end;
        }

        println!();
        (draft, update.clone()).print_formatted();
        println!();

        roster.revise_edit(update).await?;
        roster.submit_edit().await?;
        println!("Member {} updated.", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteMember {
    #[clap(short, long)]
    pub id: MemberId,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

/// Show the member and ask the operator. Anything but
/// a clear yes keeps the member.
fn confirm_delete(member: &Member) -> bool {
    println!();
    member.print_formatted();
    println!();
    match Confirm::new("Delete member?").with_default(false).prompt() {
        Ok(answer) => answer,
        Err(err) => {
            warn!(error = %err, "no confirmation, keeping member");
            false
        }
    }
}

impl DeleteMember {
    pub async fn run<DB: MemberService>(&self, roster: &Roster<DB>) -> Result<()> {
        let yes = self.yes;
        let confirm = |member: &Member| yes || confirm_delete(member);
        roster.remove(&self.id, &confirm).await?;

        if roster.snapshot().await.contains(&self.id) {
            println!("Member {} kept.", self.id);
        } else {
            println!("Member {} deleted.", self.id);
        }
        Ok(())
    }
}
