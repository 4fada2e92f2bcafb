//! Contribution passes: yearly GraphQL windows and external contributors.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Utc};
use serde_json::{json, Value};
use superinference_core::{
    round3, DayMonthHistogram, OwnerAttribution, OwnerKind, Page, Pages, Tally,
};

use crate::client::{GithubClient, ListingOutcome, CALENDAR_QUERY, PER_PAGE, REPO_CONTRIBUTIONS_QUERY};
use crate::error::GithubError;
use crate::types::{
    CalendarData, ContributionCalendar, ContributionDay, Contributor, RepoContributionCollection,
    RepoContributionData, RepoSummary, RepositoryContribution,
};

use super::sections::{ContributionSection, OtherRepoContribution};

/// One GraphQL query window, at most a calendar year long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct YearWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Splits `created_at..=now` into calendar-year windows.
///
/// The first window starts at `created_at`, the last ends at `now`, and every
/// other window spans Jan 1 00:00:00 to Dec 31 23:59:59.
pub(crate) fn year_windows(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Vec<YearWindow> {
    (created_at.year()..=now.year())
        .filter_map(|year| {
            let from = if year == created_at.year() {
                created_at
            } else {
                NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc()
            };
            let to = if year == now.year() {
                now
            } else {
                NaiveDate::from_ymd_opt(year, 12, 31)?.and_hms_opt(23, 59, 59)?.and_utc()
            };
            Some(YearWindow { from, to })
        })
        .collect()
}

/// Contributions fetched for one window.
struct WindowData {
    calendar: ContributionCalendar,
    repos: RepoContributionCollection,
}

pub(crate) struct ContributionInputs<'a> {
    pub username: &'a str,
    pub created_at: DateTime<Utc>,
    pub now: DateTime<Utc>,
    pub include_private: bool,
    pub closest_user_n: usize,
    /// Most popular original repositories, best first.
    pub popular: &'a [RepoSummary],
}

/// Runs the contribution passes for an authenticated call.
///
/// With `skip` set (an earlier pass spent the quota) nothing is fetched and
/// the section comes back empty and incomplete.
pub(crate) async fn contribution_pass(
    client: &GithubClient,
    inputs: &ContributionInputs<'_>,
    skip: bool,
) -> ContributionSection {
    if skip {
        return ContributionSection::degraded();
    }

    let mut fold = ContributionFold::new(inputs.username, inputs.include_private, inputs.now);
    let windows = year_windows(inputs.created_at, inputs.now);
    let windows_outcome = window_pass(client, inputs.username, &windows, &mut fold).await;
    if windows_outcome.failed() {
        return ContributionSection::degraded();
    }

    let mut external = Tally::new();
    let external_outcome = if windows_outcome.rate_limited() {
        ListingOutcome::skipped()
    } else {
        external_pass(client, inputs.username, inputs.popular, &mut external).await
    };
    if external_outcome.failed() {
        external = Tally::new();
    }

    let incomplete = windows_outcome.completion().incomplete
        || external_outcome.completion().incomplete;
    fold.finish(incomplete, &external, inputs.created_at, inputs.closest_user_n)
}

async fn window_pass(
    client: &GithubClient,
    username: &str,
    windows: &[YearWindow],
    fold: &mut ContributionFold<'_>,
) -> ListingOutcome {
    let mut pages = Pages::new(
        |cursor: Option<String>| {
            let index = cursor.and_then(|c| c.parse::<usize>().ok()).unwrap_or(0);
            let next = (index + 1 < windows.len()).then(|| (index + 1).to_string());
            let window = windows.get(index).copied();
            async move {
                let Some(window) = window else {
                    return Ok(Page::new(Vec::new(), None, false));
                };
                fetch_window(client, username, window, index)
                    .await
                    .map(|page| page.continue_at(next))
            }
        },
        None,
    );

    let mut folded = 0;
    let mut error = None;
    while let Some(batch) = pages.next_page().await {
        match batch {
            Ok(records) => {
                for data in records {
                    fold.add_window(data);
                    folded += 1;
                }
            }
            Err(e) => error = Some(e),
        }
    }

    ListingOutcome {
        stop: pages.stop(),
        folded,
        error,
    }
    .logged("contribution windows")
}

/// Fetches the calendar and per-repository contributions of one window.
///
/// The window is refused as a whole when either query is refused.
async fn fetch_window(
    client: &GithubClient,
    username: &str,
    window: YearWindow,
    index: usize,
) -> Result<Page<WindowData>, GithubError> {
    let cursor = index.to_string();
    let variables = json!({
        "login": username,
        "from": window.from.to_rfc3339_opts(SecondsFormat::Secs, true),
        "to": window.to.to_rfc3339_opts(SecondsFormat::Secs, true),
    });

    let calendar: Page<CalendarData> = client
        .graphql(CALENDAR_QUERY, variables.clone(), &cursor)
        .await?;
    if calendar.is_refused() {
        return Ok(Page::refused(cursor));
    }
    let repos: Page<RepoContributionData> = client
        .graphql(REPO_CONTRIBUTIONS_QUERY, variables, &cursor)
        .await?;
    if repos.is_refused() {
        return Ok(Page::refused(cursor));
    }

    let spent = calendar.rate_limited || repos.rate_limited;
    let calendar = calendar
        .records
        .into_iter()
        .next()
        .and_then(|data| data.user)
        .map(|user| user.contributions_collection.contribution_calendar)
        .ok_or_else(|| GithubError::Graphql(format!("no contribution calendar for {username}")))?;
    let repos = repos
        .records
        .into_iter()
        .next()
        .and_then(|data| data.user)
        .map(|user| user.contributions_collection)
        .unwrap_or_default();

    tracing::debug!(
        username,
        from = %window.from,
        to = %window.to,
        total = calendar.total_contributions,
        "contribution window fetched"
    );
    Ok(Page::new(vec![WindowData { calendar, repos }], None, spent))
}

/// Sums contributions by users other than `username` to the popular repos.
async fn external_pass(
    client: &GithubClient,
    username: &str,
    popular: &[RepoSummary],
    external: &mut Tally,
) -> ListingOutcome {
    let urls: Vec<String> = popular
        .iter()
        .map(|r| format!("{}?per_page={PER_PAGE}", r.contributors_url))
        .collect();
    client
        .fold_each("external contributors", &urls, |_, raw| {
            fold_external_contributor(external, username, raw);
        })
        .await
}

fn fold_external_contributor(external: &mut Tally, username: &str, raw: Value) {
    match serde_json::from_value::<Contributor>(raw) {
        Ok(c) if c.login.eq_ignore_ascii_case(username) => {}
        Ok(c) => external.add(&c.login, c.contributions),
        Err(e) => tracing::warn!(error = %e, "skipping malformed contributor record"),
    }
}

/// Running state of the contribution windows pass.
struct ContributionFold<'a> {
    username: &'a str,
    include_private: bool,
    histogram: DayMonthHistogram,
    total: u64,
    owned: Tally,
    /// Keyed by repository URL.
    other: Tally,
    other_meta: HashMap<String, OtherRepoContribution>,
    owners: OwnerAttribution,
    now: DateTime<Utc>,
}

impl<'a> ContributionFold<'a> {
    fn new(username: &'a str, include_private: bool, now: DateTime<Utc>) -> Self {
        Self {
            username,
            include_private,
            histogram: DayMonthHistogram::new(now),
            total: 0,
            owned: Tally::new(),
            other: Tally::new(),
            other_meta: HashMap::new(),
            owners: OwnerAttribution::new(),
            now,
        }
    }

    fn add_window(&mut self, data: WindowData) {
        self.total += data.calendar.total_contributions;
        for week in data.calendar.weeks {
            for raw in week.contribution_days {
                match serde_json::from_value::<ContributionDay>(raw) {
                    Ok(day) => self.histogram.record(day.date, day.contribution_count),
                    Err(e) => tracing::warn!(error = %e, "skipping malformed contribution day"),
                }
            }
        }
        for raw in data.repos.into_records() {
            match serde_json::from_value::<RepositoryContribution>(raw) {
                Ok(contribution) => self.add_repo(contribution),
                Err(e) => tracing::warn!(error = %e, "skipping malformed repository contribution"),
            }
        }
    }

    fn add_repo(&mut self, contribution: RepositoryContribution) {
        let repo = contribution.repository;
        if repo.is_private && !self.include_private {
            return;
        }
        let Some(kind) = OwnerKind::parse(&repo.owner.typename) else {
            tracing::warn!(
                owner = %repo.owner.login,
                typename = %repo.owner.typename,
                "skipping contribution with unknown owner type"
            );
            return;
        };
        let count = contribution.contributions.total_count;

        if repo.owner.login.eq_ignore_ascii_case(self.username) {
            self.owned.add(&repo.name, count);
        } else {
            self.other.add(&repo.url, count);
            let top_language = repo.top_language().map(super::skill::normalize_language);
            self.other_meta
                .entry(repo.url.clone())
                .or_insert_with(|| OtherRepoContribution {
                    name: repo.name.clone(),
                    owner: repo.owner.login.clone(),
                    html_url: repo.url.clone(),
                    description: repo.description.clone(),
                    top_language,
                    contributions_count: 0,
                });
        }
        self.owners.record(kind, &repo.owner.login, count);
    }

    fn finish(
        self,
        incomplete: bool,
        external: &Tally,
        created_at: DateTime<Utc>,
        closest_user_n: usize,
    ) -> ContributionSection {
        let mut other_meta = self.other_meta;
        let other_repos = self
            .other
            .ranked()
            .into_inner()
            .into_iter()
            .filter_map(|(url, count)| {
                other_meta.remove(&url).map(|meta| OtherRepoContribution {
                    contributions_count: count,
                    ..meta
                })
            })
            .collect();

        ContributionSection {
            incomplete_contribution_results: incomplete,
            inference_from_contribution_count: self.histogram.days_folded(),
            contribution_count: self.total,
            weekly_average_contribution: weekly_average(self.total, created_at, self.now),
            contribution_count_per_day: self.histogram.per_day().ranked(),
            contribution_count_per_month: self.histogram.per_month().ranked(),
            contribution_count_per_owned_repo: self.owned.ranked(),
            contribution_count_per_other_repo: other_repos,
            contribution_count_per_repo_org_owner: self.owners.organizations().ranked(),
            contribution_count_per_repo_user_owner: self.owners.users().ranked(),
            external_contribution_to_top_10_repo: external.ranked(),
            closest_users: external.top_keys(closest_user_n),
        }
    }
}

/// `total / round(days_since_creation / 7)`, rounded to 3 decimals; 0 for
/// accounts younger than half a week.
fn weekly_average(total: u64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let weeks = ((now - created_at).num_days() as f64 / 7.0).round();
    if weeks <= 0.0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let total = total as f64;
    round3(total / weeks)
}
