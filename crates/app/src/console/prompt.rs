//! Line-based input with bounded re-prompting, plus the parsers the
//! console validates answers with.
use std::io::{BufRead, Write};
use std::str::FromStr;

use chrono::NaiveDate;
use crossterm::{
    queue,
    style::{PrintStyledContent, Stylize},
};
use engine::MoneyCents;

use crate::error::{AppError, Result};

pub struct Prompter<R, W> {
    input: R,
    output: W,
    max_attempts: u32,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, max_attempts: u32) -> Self {
        Self {
            input,
            output,
            max_attempts: max_attempts.max(1),
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until `parse` accepts the answer, at most `max_attempts` times.
    pub fn ask<T>(
        &mut self,
        prompt: &str,
        parse: impl Fn(&str) -> std::result::Result<T, String>,
    ) -> Result<T> {
        for _ in 0..self.max_attempts {
            let line = self.read_line(prompt)?;
            match parse(&line) {
                Ok(value) => return Ok(value),
                Err(msg) => self.error(&format!("{msg} Please try again."))?,
            }
        }
        Err(AppError::TooManyAttempts)
    }

    pub fn text(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt, parse_text)
    }

    pub fn email(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt, parse_email)
    }

    pub fn date(&mut self, prompt: &str) -> Result<NaiveDate> {
        self.ask(prompt, parse_date)
    }

    pub fn id(&mut self, prompt: &str) -> Result<i32> {
        self.ask(prompt, parse_id)
    }

    pub fn money(&mut self, prompt: &str) -> Result<MoneyCents> {
        self.ask(prompt, parse_money)
    }

    /// Numbered choice in `1..=options`.
    pub fn choice(&mut self, prompt: &str, options: usize) -> Result<usize> {
        self.ask(prompt, |raw| parse_choice(raw, options))
    }

    pub fn yes_no(&mut self, prompt: &str) -> Result<bool> {
        self.ask(prompt, parse_yes_no)
    }

    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn heading(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "\n---------------------------------------")?;
        queue!(self.output, PrintStyledContent(text.bold()))?;
        writeln!(self.output)?;
        Ok(())
    }

    pub fn success(&mut self, text: &str) -> Result<()> {
        queue!(self.output, PrintStyledContent(format!("\n✅ {text}").green()))?;
        writeln!(self.output)?;
        Ok(())
    }

    pub fn notice(&mut self, text: &str) -> Result<()> {
        queue!(self.output, PrintStyledContent(format!("\n❗ {text}").yellow()))?;
        writeln!(self.output)?;
        Ok(())
    }

    pub fn error(&mut self, text: &str) -> Result<()> {
        queue!(self.output, PrintStyledContent(format!("\n❌ {text}").red()))?;
        writeln!(self.output)?;
        Ok(())
    }
}

pub fn parse_text(raw: &str) -> std::result::Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("Input cannot be empty.".to_string());
    }
    Ok(value.to_string())
}

pub fn parse_email(raw: &str) -> std::result::Result<String, String> {
    engine::normalize_email(raw).map_err(|_| "Invalid email format.".to_string())
}

pub fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    engine::parse_date(raw).map_err(|_| "Invalid date format. Please use YYYY-MM-DD.".to_string())
}

pub fn parse_id(raw: &str) -> std::result::Result<i32, String> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err("Please enter a positive numeric ID.".to_string()),
    }
}

pub fn parse_money(raw: &str) -> std::result::Result<MoneyCents, String> {
    match MoneyCents::from_str(raw) {
        Ok(amount) if amount.is_positive() => Ok(amount),
        Ok(_) => Err("Amount must be greater than zero.".to_string()),
        Err(_) => Err("Invalid amount. Use at most two decimals, e.g. 12.50.".to_string()),
    }
}

pub fn parse_choice(raw: &str, options: usize) -> std::result::Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(n) if (1..=options).contains(&n) => Ok(n),
        _ => Err(format!("Please enter a number from 1 to {options}.")),
    }
}

pub fn parse_yes_no(raw: &str) -> std::result::Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err("Enter (y) for Yes or (n) for No.".to_string()),
    }
}
