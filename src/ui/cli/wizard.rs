use std::fmt::{Display, Formatter};
use std::io::Write;

use anyhow::{Context, Result};
use chrono::Days;
use strum::{EnumMessage, IntoEnumIterator};
use strum_macros::{EnumIter, EnumMessage, IntoStaticStr};

use crate::core::DonorHistory;
use crate::integrations::{Channel, DEFAULT_REQUEST_ID, default_message};
use crate::ui::cli::actions::{Action, App};
use crate::ui::cli::drivers::PromptDriver;

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumMessage, IntoStaticStr)]
pub enum MenuItem {
    #[strum(message = "Summary", detailed_message = "accuracy, AUC and eligible donors")]
    Summary,
    #[strum(message = "Donation prediction", detailed_message = "will this donor give again?")]
    Predict,
    #[strum(message = "Eligibility checker", detailed_message = "next date after the cooldown")]
    Eligibility,
    #[strum(message = "Leaderboard", detailed_message = "top contributors with badges")]
    Leaderboard,
    #[strum(message = "Notifications", detailed_message = "simulated SMS / WhatsApp / Email")]
    Notify,
    #[strum(message = "Case lookup (demo)", detailed_message = "fetch a blood request")]
    Case,
    #[strum(message = "Export sample roster", detailed_message = "write a synthetic donors CSV")]
    SampleRoster,
    #[strum(message = "Quit")]
    Quit,
}

struct KindItem<K> {
    kind: K,
    text: String,
}

impl<K> Display for KindItem<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

fn kind_items<K>() -> Vec<KindItem<K>>
where
    K: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator,
{
    K::iter()
        .map(|k| {
            let label = k.get_message().unwrap_or_else(|| k.into());
            let desc = k.get_detailed_message().unwrap_or("");
            let text = if desc.is_empty() {
                label.to_string()
            } else {
                format!("{label}  {DIM_ITALIC}{desc}{RESET}")
            };
            KindItem { kind: k, text }
        })
        .collect()
}

fn select_kind<K, D>(driver: &D, title: &str, help: &str) -> Result<K>
where
    K: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator,
    D: PromptDriver,
{
    let items = kind_items::<K>();
    let labels: Vec<String> = items.iter().map(|i| i.to_string()).collect();
    let idx = driver.ask_select(title, help, &labels, 0)?;
    items
        .get(idx)
        .map(|i| i.kind)
        .context("selection out of range")
}

fn ask_u32<D: PromptDriver>(driver: &D, title: &str, default: u32, max: u32) -> Result<u32> {
    let v = driver.ask_u64(title, "", default as u64, Some(0), Some(max as u64))?;
    Ok(v.min(max as u64) as u32)
}

/// Ask for one menu entry and its inputs. `None` means the user quit.
pub fn prompt_action<D: PromptDriver>(driver: &D, app: &App) -> Result<Option<Action>> {
    let item = select_kind::<MenuItem, _>(driver, "What would you like to do?", "")?;
    let today = app.today();

    let action = match item {
        MenuItem::Summary => Action::Summary,
        MenuItem::Predict => Action::Predict(DonorHistory::new(
            ask_u32(driver, "Recency (months since last donation)", 5, 50)?,
            ask_u32(driver, "Frequency (times donated)", 2, 50)?,
            ask_u32(driver, "Monetary (c.c. blood donated total)", 750, 20_000)?,
            ask_u32(driver, "Time (months since first donation)", 20, 200)?,
        )),
        MenuItem::Eligibility => {
            let name = driver.ask_string("Donor name", "", "Rohan")?;
            let default = today.checked_sub_days(Days::new(120)).unwrap_or(today);
            let last_donation = driver.ask_date(
                "Last donation date",
                "Demo only. Actual eligibility depends on many medical factors.",
                default,
            )?;
            Action::Eligibility {
                name,
                last_donation,
            }
        }
        MenuItem::Leaderboard => {
            let top = driver.ask_u64("How many donors?", "0 shows everyone", 10, None, None)?;
            Action::Leaderboard {
                top: (top > 0).then_some(top as usize),
            }
        }
        MenuItem::Notify => {
            let name = driver.ask_string("Recipient name", "", "Rohan Sharma")?;
            let phone = driver.ask_string("Phone (E.164 / demo)", "", "+91XXXXXXXXXX")?;
            let channels: Vec<Channel> = Channel::iter().collect();
            let labels: Vec<String> = channels.iter().map(Channel::to_string).collect();
            let idx = driver.ask_select("Channel", "", &labels, 0)?;
            let channel = channels.get(idx).copied().context("selection out of range")?;
            let message = driver.ask_string("Message", "", &default_message(&name))?;
            Action::Notify {
                name,
                phone,
                channel,
                message: Some(message),
            }
        }
        MenuItem::Case => Action::Case {
            request_id: driver.ask_string("Request / case id", "", DEFAULT_REQUEST_ID)?,
        },
        MenuItem::SampleRoster => {
            let path = driver.ask_string("Output file", "", "sample_donors.csv")?;
            Action::SampleRoster {
                output: Some(path.trim().into()),
                rows: Some(app.config().roster.export_size),
            }
        }
        MenuItem::Quit => return Ok(None),
    };
    Ok(Some(action))
}

/// Interactive loop: keep offering the menu until the user quits. Failed
/// actions are reported and the menu comes back.
pub fn run_menu<D: PromptDriver, W: Write>(
    driver: &D,
    app: &mut App,
    out: &mut W,
) -> Result<()> {
    while let Some(action) = prompt_action(driver, app)? {
        match app.execute(&action) {
            Ok(text) => writeln!(out, "{text}\n")?,
            Err(e) => writeln!(out, "✗ {e:#}\n")?,
        }
    }
    Ok(())
}
