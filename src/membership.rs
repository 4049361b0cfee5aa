// Who submitted for which period, independent of what they submitted.
use crate::category::{FiscalYear, Month};
use crate::types::{Member, Role, SubmissionRecord, UserId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodMembership {
    pub submitted_count: usize,
    pub not_submitted_count: usize,
    pub total: usize,
    /// Someone outside the roster submitted for this period, i.e. the
    /// roster changed between the two reads.
    pub anomaly: bool,
}

/// Members counted for submission coverage: plain users only.
pub fn roster_of(members: &[Member]) -> BTreeSet<UserId> {
    members
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.id)
        .collect()
}

pub fn submission_set(records: &[SubmissionRecord]) -> HashSet<(UserId, FiscalYear, Month)> {
    records
        .iter()
        .map(|r| (r.user_id, r.fiscal_year, r.month))
        .collect()
}

pub fn reconcile(
    roster: &BTreeSet<UserId>,
    submissions: &HashSet<(UserId, FiscalYear, Month)>,
    periods: &[(FiscalYear, Month)],
) -> BTreeMap<(FiscalYear, Month), PeriodMembership> {
    let mut out = BTreeMap::new();
    for &(year, month) in periods {
        let submitted_count = roster
            .iter()
            .filter(|u| submissions.contains(&(**u, year, month)))
            .count();
        let outsiders = submissions
            .iter()
            .filter(|(u, y, m)| *y == year && *m == month && !roster.contains(u))
            .count();
        if outsiders > 0 {
            log::warn!(
                "membership: {} submitter(s) for {}/{} are not on the roster",
                outsiders,
                month.number(),
                year
            );
        }
        let total = roster.len();
        out.insert(
            (year, month),
            PeriodMembership {
                submitted_count,
                not_submitted_count: total.saturating_sub(submitted_count),
                total,
                anomaly: outsiders > 0,
            },
        );
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberActivity {
    pub member_id: String,
    pub name: String,
    pub role: Role,
    pub total_submitted_count: usize,
    pub submissions_by_year: BTreeMap<FiscalYear, usize>,
    /// Distinct months submitted, per year, ascending.
    pub submissions_in_period: BTreeMap<FiscalYear, Vec<u8>>,
}

/// Lifetime submission history for every member, ordered by role name
/// descending (`user`, `master`, `admin`) and then by name.
pub fn member_activity(members: &[Member], submissions: &[SubmissionRecord]) -> Vec<MemberActivity> {
    let mut by_user: BTreeMap<UserId, MemberActivity> = members
        .iter()
        .map(|m| {
            let name = if m.name.trim().is_empty() {
                m.email.clone()
            } else {
                m.name.clone()
            };
            (
                m.id,
                MemberActivity {
                    member_id: m.id.to_string(),
                    name,
                    role: m.role,
                    total_submitted_count: 0,
                    submissions_by_year: BTreeMap::new(),
                    submissions_in_period: BTreeMap::new(),
                },
            )
        })
        .collect();

    for sub in submissions {
        let Some(entry) = by_user.get_mut(&sub.user_id) else {
            continue;
        };
        entry.total_submitted_count += 1;
        *entry.submissions_by_year.entry(sub.fiscal_year).or_default() += 1;
        let months = entry.submissions_in_period.entry(sub.fiscal_year).or_default();
        if let Err(pos) = months.binary_search(&sub.month.number()) {
            months.insert(pos, sub.month.number());
        }
    }

    let mut out: Vec<MemberActivity> = by_user.into_values().collect();
    out.sort_by(|a, b| {
        b.role
            .as_str()
            .cmp(a.role.as_str())
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    fn member(id: UserId, name: &str, role: Role) -> Member {
        Member {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", id),
            role,
        }
    }

    #[test]
    fn counts_submitted_and_missing_members() {
        let roster: BTreeSet<UserId> = [1, 2, 3].into_iter().collect();
        let subs: HashSet<_> = [(1, 2568, m(1)), (2, 2568, m(1)), (1, 2568, m(2))]
            .into_iter()
            .collect();
        let out = reconcile(&roster, &subs, &[(2568, m(1)), (2568, m(2)), (2568, m(3))]);
        assert_eq!(out[&(2568, m(1))].submitted_count, 2);
        assert_eq!(out[&(2568, m(1))].not_submitted_count, 1);
        assert_eq!(out[&(2568, m(2))].submitted_count, 1);
        assert_eq!(out[&(2568, m(3))].not_submitted_count, 3);
        assert!(out.values().all(|p| p.total == 3 && !p.anomaly));
    }

    #[test]
    fn shrunken_roster_is_flagged_not_negative() {
        let roster: BTreeSet<UserId> = [1].into_iter().collect();
        let subs: HashSet<_> = [(1, 2568, m(5)), (7, 2568, m(5)), (8, 2568, m(5))]
            .into_iter()
            .collect();
        let out = reconcile(&roster, &subs, &[(2568, m(5))]);
        let p = out[&(2568, m(5))];
        assert_eq!(p.submitted_count, 1);
        assert_eq!(p.not_submitted_count, 0);
        assert!(p.anomaly);
    }

    #[test]
    fn roster_only_counts_plain_users() {
        let members = vec![
            member(1, "A", Role::User),
            member(2, "B", Role::Admin),
            member(3, "C", Role::Master),
        ];
        assert_eq!(roster_of(&members), [1].into_iter().collect());
    }

    #[test]
    fn activity_tracks_years_and_distinct_months() {
        let members = vec![member(1, "Somchai", Role::User), member(2, "", Role::Admin)];
        let subs = vec![
            SubmissionRecord { user_id: 1, fiscal_year: 2568, month: m(3) },
            SubmissionRecord { user_id: 1, fiscal_year: 2568, month: m(1) },
            SubmissionRecord { user_id: 1, fiscal_year: 2568, month: m(3) },
            SubmissionRecord { user_id: 1, fiscal_year: 2567, month: m(12) },
            SubmissionRecord { user_id: 99, fiscal_year: 2568, month: m(1) },
        ];
        let out = member_activity(&members, &subs);
        assert_eq!(out[1].role, Role::Admin);
        assert_eq!(out[1].name, "2@example.com");
        let somchai = &out[0];
        assert_eq!(somchai.total_submitted_count, 4);
        assert_eq!(somchai.submissions_by_year[&2568], 3);
        assert_eq!(somchai.submissions_in_period[&2568], vec![1, 3]);
        assert_eq!(somchai.submissions_in_period[&2567], vec![12]);
    }

    #[test]
    fn activity_orders_users_then_masters_then_admins() {
        let members = vec![
            member(1, "Dao", Role::Admin),
            member(2, "Mali", Role::Master),
            member(3, "Preecha", Role::User),
            member(4, "Anong", Role::User),
            member(5, "Boon", Role::Master),
        ];
        let activity = member_activity(&members, &[]);
        let order: Vec<&str> = activity.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(order, vec!["Anong", "Preecha", "Boon", "Mali", "Dao"]);
    }
}
