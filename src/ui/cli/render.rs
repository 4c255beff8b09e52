//! Plain-text views of session results, with ANSI styling.

use crate::data::{DatasetSource, RosterLoad, RosterSource};
use crate::eligibility::Eligibility;
use crate::leaderboard::{Badge, LeaderboardEntry};
use crate::tasks::{Prediction, Session, Summary};

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const FG_CYAN: &str = "\x1b[36m";
pub const FG_GREEN: &str = "\x1b[32m";
pub const FG_YELLOW: &str = "\x1b[33m";
pub const FG_RED: &str = "\x1b[31m";
pub const FG_GREY: &str = "\x1b[90m";

const RULE: &str = "────────────────────────────────────────────────────────────────────────";

pub fn header(session: &Session) -> String {
    let dataset = match session.dataset_source() {
        DatasetSource::File(p) => p.display().to_string(),
        DatasetSource::Synthetic { rows, seed } => format!("synthetic ({rows} rows, seed {seed})"),
    };
    let roster = match &session.roster().source {
        RosterSource::File(p) => p.display().to_string(),
        RosterSource::Sample { rows, seed } => format!("sample ({rows} donors, seed {seed})"),
    };

    let mut lines = vec![
        format!("{BOLD}{FG_CYAN}▶ donorcast{RESET}"),
        format!("{DIM}dataset={dataset}  roster={roster}{RESET}"),
    ];
    if let Some(e) = session.dataset_warning() {
        lines.push(format!("{FG_YELLOW}! dataset not used: {e}{RESET}"));
    }
    if let Some(w) = roster_warning(session.roster()) {
        lines.push(w);
    }
    if let Err(e) = session.scorer() {
        lines.push(format!("{FG_RED}! prediction disabled: {e}{RESET}"));
    }
    lines.push(format!("{FG_GREY}{RULE}{RESET}"));
    lines.join("\n")
}

/// Why an uploaded roster was replaced by the sample roster, if it was.
pub fn roster_warning(roster: &RosterLoad) -> Option<String> {
    roster
        .warning
        .as_ref()
        .map(|e| format!("{FG_YELLOW}! roster not used: {e}{RESET}"))
}

pub fn summary(s: &Summary) -> String {
    format!(
        "{BOLD}Model Accuracy{RESET}         {}\n\
         {BOLD}ROC AUC{RESET}                {}\n\
         {BOLD}Eligible Donors Today{RESET}  {}\n\
         {BOLD}Total Donors{RESET}           {}\n\
         {DIM}cooldown={} days{RESET}",
        s.accuracy_label, s.roc_auc_label, s.eligible_today, s.total_donors, s.cooldown_days
    )
}

pub fn prediction(p: &Prediction) -> String {
    let pct = p.confidence * 100.0;
    if p.likely {
        format!("{FG_GREEN}✅ Likely to donate again (confidence ~ {pct:.1}%).{RESET}")
    } else {
        format!("{FG_YELLOW}⚠️ Unlikely to donate again (confidence ~ {pct:.1}%).{RESET}")
    }
}

pub fn eligibility(name: &str, e: &Eligibility) -> String {
    if e.eligible {
        format!(
            "{FG_GREEN}✅ {name} is eligible to donate today. Next eligible date was {}.{RESET}",
            e.next_eligible_date
        )
    } else {
        format!(
            "🗓️ {name} will be eligible on {BOLD}{}{RESET} (in {} days).",
            e.next_eligible_date, e.days_left
        )
    }
}

fn badge_label(badge: Option<Badge>) -> String {
    match badge {
        Some(Badge::Bronze) => "🥉 Bronze".into(),
        Some(Badge::Silver) => "🥈 Silver".into(),
        Some(Badge::Gold) => "🥇 Gold".into(),
        Some(Badge::Platinum) => "👑 Platinum".into(),
        None => "-".into(),
    }
}

pub fn leaderboard(entries: &[LeaderboardEntry]) -> String {
    let mut out = format!(
        "{BOLD}{:>4}  {:<20} {:<5} {:>6}  {:<10} {:>8}  {}{RESET}\n",
        "rank", "name", "group", "total", "last", "score", "badge"
    );
    for e in entries {
        out.push_str(&format!(
            "{:>4}  {:<20} {:<5} {:>6}  {:<10} {:>8.1}  {}\n",
            e.rank,
            e.name,
            e.blood_group.to_string(),
            e.total_donations,
            e.last_donation_date.to_string(),
            e.contribution_score,
            badge_label(e.badge)
        ));
    }
    out.push_str(&format!(
        "{DIM}Badges: Bronze 3+, Silver 6+, Gold 10+, Platinum 15+ donations{RESET}"
    ));
    out
}
