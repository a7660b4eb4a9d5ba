use chrono::{DateTime, Local, Utc};

use gym_data::{datetime, Member, MemberDraft};
use gym_roster::Row;

macro_rules! next_attr {
    ($old:ident, $new:ident) => {
        if $old != $new {
            format!(" -> {}", $new)
        } else {
            "".to_string()
        }
    };
    ($old:ident, $new:ident, $attr:ident) => {
        if $old.$attr != $new.$attr {
            format!(" -> {}", $new.$attr)
        } else {
            "".to_string()
        }
    };
}

/// A membership date as the operator reads it
pub fn local_date(instant: &DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Date text of a draft, shown as a local date when it parses
fn draft_date(text: &str) -> String {
    match datetime::parse_instant(text) {
        Some(instant) => local_date(&instant),
        None => text.to_string(),
    }
}

pub trait PrintFormatted {
    fn print_formatted(&self);
}

impl PrintFormatted for Member {
    fn print_formatted(&self) {
        let status = self.status_at(&datetime::now());

        println!("ID:\t\t\t{}", self.id);
        println!("Name:\t\t\t{}", self.name);
        println!("Email:\t\t\t{}", self.email);
        println!("Phone:\t\t\t{}", self.phone);
        println!("Start:\t\t\t{}", local_date(&self.membership_start));
        println!("End:\t\t\t{}", local_date(&self.membership_end));
        println!("Status:\t\t\t{}", status);
        if self.has_inverted_term() {
            println!("Note:\t\t\tmembership ends before it starts");
        }
    }
}

impl PrintFormatted for MemberDraft {
    fn print_formatted(&self) {
        println!("Name:\t\t\t{}", self.name);
        println!("Email:\t\t\t{}", self.email);
        println!("Phone:\t\t\t{}", self.phone);
        println!("Start:\t\t\t{}", draft_date(&self.membership_start));
        println!("End:\t\t\t{}", draft_date(&self.membership_end));
    }
}

impl PrintFormatted for (MemberDraft, MemberDraft) {
    fn print_formatted(&self) {
        let (old, new) = self;

        let next_name = next_attr!(old, new, name);
        println!("Name:\t\t\t{}{}", old.name, next_name);
        let next_email = next_attr!(old, new, email);
        println!("Email:\t\t\t{}{}", old.email, next_email);
        let next_phone = next_attr!(old, new, phone);
        println!("Phone:\t\t\t{}{}", old.phone, next_phone);

        let start_old = draft_date(&old.membership_start);
        let start_new = draft_date(&new.membership_start);
        let next_start = next_attr!(start_old, start_new);
        println!("Start:\t\t\t{}{}", start_old, next_start);
        let end_old = draft_date(&old.membership_end);
        let end_new = draft_date(&new.membership_end);
        let next_end = next_attr!(end_old, end_new);
        println!("End:\t\t\t{}{}", end_old, next_end);
    }
}

impl PrintFormatted for [Row<'_>] {
    fn print_formatted(&self) {
        if self.is_empty() {
            println!("No members found.");
            return;
        }
        println!(
            "{:>4}\t{:<24}\t{:<30}\t{:<16}\t{:<10}\t{:<10}\t{}",
            "#", "Name", "Email", "Phone", "Start", "End", "Status"
        );
        println!("{:-<130}", "-");

        for row in self {
            let member = row.member;
            println!(
                "{:>4}\t{:<24}\t{:<30}\t{:<16}\t{:<10}\t{:<10}\t{}",
                row.ordinal,
                member.name,
                member.email,
                member.phone,
                local_date(&member.membership_start),
                local_date(&member.membership_end),
                row.status,
            );
        }
    }
}
