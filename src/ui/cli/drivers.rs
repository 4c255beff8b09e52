use anyhow::Result;
use chrono::NaiveDate;
use inquire::{CustomType, Select, Text};

/// Seam between the interactive menu and the terminal.
pub trait PromptDriver {
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String>;

    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64>;

    fn ask_date(&self, title: &str, help: &str, default: NaiveDate) -> Result<NaiveDate>;

    /// Index of the chosen option.
    fn ask_select(&self, title: &str, help: &str, options: &[String], start: usize)
    -> Result<usize>;
}

pub struct InquireDriver;

impl PromptDriver for InquireDriver {
    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        let mut prompt = Text::new(title).with_default(default);
        if !help.is_empty() {
            prompt = prompt.with_help_message(help);
        }
        Ok(prompt.prompt()?)
    }

    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        loop {
            let value = CustomType::<u64>::new(title)
                .with_default(default)
                .with_help_message(help)
                .with_error_message("Please type a whole number")
                .prompt()?;
            match check_range(value, min, max) {
                Ok(()) => return Ok(value),
                Err(msg) => eprintln!("✗ {msg}"),
            }
        }
    }

    fn ask_date(&self, title: &str, help: &str, default: NaiveDate) -> Result<NaiveDate> {
        Ok(CustomType::<NaiveDate>::new(title)
            .with_default(default)
            .with_help_message(help)
            .with_error_message("Please type a date as YYYY-MM-DD")
            .prompt()?)
    }

    fn ask_select(
        &self,
        title: &str,
        help: &str,
        options: &[String],
        start: usize,
    ) -> Result<usize> {
        let mut select = Select::new(title, options.to_vec())
            .with_starting_cursor(start.min(options.len().saturating_sub(1)));
        if !help.is_empty() {
            select = select.with_help_message(help);
        }
        Ok(select.raw_prompt()?.index)
    }
}

pub(crate) fn check_range(value: u64, min: Option<u64>, max: Option<u64>) -> Result<(), String> {
    if let Some(lo) = min
        && value < lo
    {
        return Err(format!("must be at least {lo}"));
    }
    if let Some(hi) = max
        && value > hi
    {
        return Err(format!("must be at most {hi}"));
    }
    Ok(())
}
