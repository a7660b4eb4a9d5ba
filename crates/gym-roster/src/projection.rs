//! What the roster shows: the members of a snapshot matching the
//! search text and the status filter, numbered in display order.
//!
//! Status is derived anew for every projection, the same member may
//! show up as active in one projection and as expired in the next.

use chrono::{DateTime, Utc};

use gym_data::{Member, MembershipStatus, StatusFilter};

/// Search text and status filter of the roster view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub filter: StatusFilter,
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, filter: StatusFilter) -> Self {
        Self {
            search: search.into(),
            filter,
        }
    }

    /// Both predicates hold
    pub fn matches(&self, member: &Member, now: &DateTime<Utc>) -> bool {
        matches_search(member, &self.search) && matches_filter(member, self.filter, now)
    }
}

/// A displayed member
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    /// 1-based position among the displayed rows
    pub ordinal: usize,
    pub member: &'a Member,
    pub status: MembershipStatus,
}

/// Case insensitive substring search over name, email and phone.
/// A blank search matches everyone, any other search is matched
/// as entered, spaces included.
pub fn matches_search(member: &Member, search: &str) -> bool {
    if search.trim().is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    [&member.name, &member.email, &member.phone]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_filter(member: &Member, filter: StatusFilter, now: &DateTime<Utc>) -> bool {
    filter.matches(member.status_at(now))
}

/// Project members onto the rows to display, keeping their order.
pub fn project<'a>(members: &'a [Member], query: &ViewQuery, now: &DateTime<Utc>) -> Vec<Row<'a>> {
    members
        .iter()
        .filter(|member| matches_search(member, &query.search))
        .filter_map(|member| {
            let status = member.status_at(now);
            query.filter.matches(status).then_some((member, status))
        })
        .enumerate()
        .map(|(pos, (member, status))| Row {
            ordinal: pos + 1,
            member,
            status,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use gym_data::MemberId;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn member(id: u64, name: &str, email: &str, phone: &str, end: DateTime<Utc>) -> Member {
        Member {
            id: MemberId::from(id),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            membership_start: date(2020, 1, 1),
            membership_end: end,
        }
    }

    fn roster() -> Vec<Member> {
        vec![
            member(1, "Alice", "alice@gym.test", "555-0100", date(2023, 1, 1)),
            member(2, "Bob", "bob@gym.test", "555-0101", date(2025, 1, 1)),
            member(3, "Malika", "m@example.org", "555-0199", date(2023, 6, 1)),
            member(4, "Dan", "dan@ALI.example", "555-0102", date(2030, 1, 1)),
            member(5, "Eve", "eve@gym.test", "+1 555 0100", date(2024, 1, 1)),
        ]
    }

    fn names(rows: &[Row]) -> Vec<String> {
        rows.iter().map(|r| r.member.name.clone()).collect()
    }

    #[test]
    fn test_expired_member() {
        let members = vec![member(1, "Alice", "", "", date(2023, 1, 1))];
        let now = date(2024, 1, 1);

        let active = project(&members, &ViewQuery::new("", StatusFilter::Active), &now);
        assert!(active.is_empty());

        let expired = project(&members, &ViewQuery::new("", StatusFilter::Expired), &now);
        assert_eq!(names(&expired), vec!["Alice"]);
        assert_eq!(expired[0].status, MembershipStatus::Expired);
    }

    #[test]
    fn test_search_name() {
        let members = vec![
            member(1, "Alice", "", "", date(2030, 1, 1)),
            member(2, "Bob", "", "", date(2030, 1, 1)),
        ];
        let now = date(2024, 1, 1);
        let rows = project(&members, &ViewQuery::new("ali", StatusFilter::All), &now);
        assert_eq!(names(&rows), vec!["Alice"]);
    }

    #[test]
    fn test_search_any_field() {
        let members = roster();
        let now = date(2024, 6, 1);

        // name, email (case insensitive) and no phone match
        let rows = project(&members, &ViewQuery::new("ALI", StatusFilter::All), &now);
        assert_eq!(names(&rows), vec!["Alice", "Malika", "Dan"]);

        // phone
        let rows = project(&members, &ViewQuery::new("0199", StatusFilter::All), &now);
        assert_eq!(names(&rows), vec!["Malika"]);

        let rows = project(&members, &ViewQuery::new("nobody", StatusFilter::All), &now);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_search_keeps_spaces() {
        let alice = member(1, "Alice", "alice@gym.test", "555-0100", date(2030, 1, 1));
        assert!(!matches_search(&alice, "ice "));
        assert!(!matches_search(&alice, " ali"));
        assert!(matches_search(&alice, "ice"));
        assert!(matches_search(&alice, "   "));

        let carol = member(2, "Carol Ann", "", "+1 555 0100", date(2030, 1, 1));
        assert!(matches_search(&carol, "ol a"));
        assert!(matches_search(&carol, "555 01"));
    }

    #[test]
    fn test_ordinals_follow_filtered_sequence() {
        let members = roster();
        let now = date(2024, 6, 1);

        let rows = project(&members, &ViewQuery::default(), &now);
        let ordinals: Vec<usize> = rows.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4, 5]);

        let rows = project(&members, &ViewQuery::new("", StatusFilter::Active), &now);
        assert_eq!(names(&rows), vec!["Bob", "Dan"]);
        assert_eq!(rows[0].ordinal, 1);
        assert_eq!(rows[1].ordinal, 2);
        assert_eq!(rows[1].member.id, MemberId::from(4));
    }

    #[test]
    fn test_filter_subset() {
        let members = roster();
        let now = date(2024, 6, 1);
        for filter in [StatusFilter::All, StatusFilter::Active, StatusFilter::Expired] {
            let rows = project(&members, &ViewQuery::new("", filter), &now);
            for row in &rows {
                assert!(members.contains(row.member));
                assert!(filter.matches(row.status));
                assert_eq!(row.status, row.member.status_at(&now));
            }
        }
        let all = project(&members, &ViewQuery::default(), &now);
        let active = project(&members, &ViewQuery::new("", StatusFilter::Active), &now);
        let expired = project(&members, &ViewQuery::new("", StatusFilter::Expired), &now);
        assert_eq!(all.len(), active.len() + expired.len());
    }

    #[test]
    fn test_empty_search_is_filter() {
        let members = roster();
        let now = date(2024, 6, 1);
        for filter in [StatusFilter::All, StatusFilter::Active, StatusFilter::Expired] {
            let rows = project(&members, &ViewQuery::new("  ", filter), &now);
            let expected: Vec<&Member> = members
                .iter()
                .filter(|m| matches_filter(m, filter, &now))
                .collect();
            let got: Vec<&Member> = rows.iter().map(|r| r.member).collect();
            assert_eq!(got, expected);
        }
    }

    #[test]
    fn test_search_and_filter_commute() {
        let members = roster();
        let now = date(2024, 6, 1);
        for search in ["", "ali", "gym", "555", "zzz"] {
            for filter in [StatusFilter::All, StatusFilter::Active, StatusFilter::Expired] {
                let search_first: Vec<&Member> = members
                    .iter()
                    .filter(|m| matches_search(m, search))
                    .filter(|m| matches_filter(m, filter, &now))
                    .collect();
                let filter_first: Vec<&Member> = members
                    .iter()
                    .filter(|m| matches_filter(m, filter, &now))
                    .filter(|m| matches_search(m, search))
                    .collect();
                assert_eq!(search_first, filter_first);

                let rows = project(&members, &ViewQuery::new(search, filter), &now);
                let projected: Vec<&Member> = rows.iter().map(|r| r.member).collect();
                assert_eq!(projected, search_first);
            }
        }
    }

    #[test]
    fn test_status_follows_time() {
        let members = vec![member(1, "Alice", "", "", date(2024, 1, 1))];
        let query = ViewQuery::new("", StatusFilter::Active);

        let rows = project(&members, &query, &date(2024, 1, 1));
        assert_eq!(rows.len(), 1);

        let later = date(2024, 1, 1) + chrono::Duration::seconds(1);
        let rows = project(&members, &query, &later);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_query_matches() {
        let alice = member(1, "Alice", "", "", date(2023, 1, 1));
        let now = date(2024, 1, 1);
        assert!(ViewQuery::new("lic", StatusFilter::Expired).matches(&alice, &now));
        assert!(!ViewQuery::new("lic", StatusFilter::Active).matches(&alice, &now));
        assert!(!ViewQuery::new("bob", StatusFilter::All).matches(&alice, &now));
    }
}
