//! The interactive front desk: membership check, then the main menu until
//! the member leaves or input ends.
use std::io::{BufRead, Write};

use chrono::NaiveDate;
use engine::{Audience, Engine, EngineError, ErrorKind, Event, Item, Member, Position, SearchField};

use crate::error::{AppError, Result};

use prompt::Prompter;

pub mod prompt;

const MAIN_MENU: [&str; 9] = [
    "Find an item in the library",
    "Borrow an item from the library",
    "Return a borrowed item",
    "Donate an item to the library",
    "Find an event in the library",
    "Register for an event in the library",
    "Volunteer for the library",
    "Ask for help from a librarian",
    "Exit Program",
];

const LIBRARIAN_MENU: [&str; 5] = [
    "How do I apply to become a librarian?",
    "Do I have any outstanding fines?",
    "Pay my fines",
    "Recommend me events",
    "Back to the main menu",
];

pub struct Console<R, W> {
    engine: Engine,
    prompt: Prompter<R, W>,
    max_attempts: u32,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(engine: Engine, input: R, output: W, max_attempts: u32) -> Self {
        Self {
            engine,
            prompt: Prompter::new(input, output, max_attempts),
            max_attempts: max_attempts.max(1),
            today: local_today,
        }
    }

    /// Replace the clock used for due dates and event checks.
    #[cfg(test)]
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.prompt.into_output()
    }

    /// Run a whole session. Closing the input ends it without error.
    pub async fn run(&mut self) -> Result<()> {
        let member = match self.identify().await {
            Ok(member) => member,
            Err(AppError::InputClosed) => return Ok(()),
            Err(AppError::TooManyAttempts) => {
                self.prompt.error("Too many invalid attempts. Goodbye.")?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        tracing::info!(email = %member.email, "session started");

        loop {
            self.prompt.heading("Please input the number of the option you would like:")?;
            for (n, label) in MAIN_MENU.iter().enumerate() {
                self.prompt.line(&format!("({}): {label}", n + 1))?;
            }
            let choice = match self.prompt.choice("Enter Number: ", MAIN_MENU.len()) {
                Ok(choice) => choice,
                Err(AppError::TooManyAttempts) => continue,
                Err(AppError::InputClosed) => break,
                Err(err) => return Err(err),
            };

            let email = member.email.as_str();
            let outcome = match choice {
                1 => self.find_item().await,
                2 => self.borrow_item(email).await,
                3 => self.return_item(email).await,
                4 => self.donate_item().await,
                5 => self.list_events().await,
                6 => self.register_event(email).await,
                7 => self.volunteer(email).await,
                8 => self.ask_librarian(email).await,
                _ => break,
            };
            if !self.settle(outcome)? {
                break;
            }
        }

        self.prompt.line("\nThank you for visiting the library. Goodbye!")?;
        tracing::info!(email = %member.email, "session ended");
        Ok(())
    }

    /// Report a failed operation. Returns `false` when the session must end.
    fn settle(&mut self, outcome: Result<()>) -> Result<bool> {
        match outcome {
            Ok(()) => Ok(true),
            Err(AppError::Engine(err)) => {
                self.report(&err)?;
                Ok(true)
            }
            Err(AppError::TooManyAttempts) => {
                self.prompt
                    .error("Too many invalid attempts. Returning to the menu.")?;
                Ok(true)
            }
            Err(AppError::InputClosed) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn report(&mut self, err: &EngineError) -> Result<()> {
        match err.kind() {
            ErrorKind::Database => {
                tracing::error!(error = %err, "database operation failed");
                self.prompt
                    .error("Something went wrong while talking to the database. Please try again.")
            }
            ErrorKind::Conflict | ErrorKind::InvalidState => self.prompt.notice(&sentence(err)),
            _ => self.prompt.error(&sentence(err)),
        }
    }

    async fn identify(&mut self) -> Result<Member> {
        for _ in 0..self.max_attempts {
            self.prompt.heading("Do you have an existing membership with us?")?;
            let existing = self.prompt.yes_no("Enter (y) for Yes or (n) for No: ")?;

            let found = if existing {
                let email = self.prompt.email("Please enter your email: ")?;
                self.engine.member(&email).await
            } else {
                self.register().await?
            };

            match found {
                Ok(member) => {
                    if existing {
                        self.prompt.success(&format!("Welcome back, {}!", member.name))?;
                    } else {
                        self.prompt.success(&format!(
                            "Membership created successfully for {}. Welcome to our library!",
                            member.name
                        ))?;
                    }
                    return Ok(member);
                }
                Err(EngineError::MemberExists(_)) => {
                    self.prompt.error(
                        "This email is already registered. Redirecting to membership check...",
                    )?;
                }
                Err(err) => self.report(&err)?,
            }
        }
        Err(AppError::TooManyAttempts)
    }

    async fn register(&mut self) -> Result<std::result::Result<Member, EngineError>> {
        self.prompt
            .line("\nTo access the library, you need to create a membership.")?;
        let name = self.prompt.text("Enter your full name: ")?;
        let birthday = self
            .prompt
            .date("Enter your full birthday in this format (YYYY-MM-DD): ")?;
        let email = self.prompt.email("Enter your email: ")?;
        Ok(self.engine.register_member(&name, birthday, &email).await)
    }

    async fn find_item(&mut self) -> Result<()> {
        self.prompt.line(
            "\nPlease enter either the Name, Author, or Genre of the item you're looking for:",
        )?;
        let field = match self.prompt.choice("(1) Name, (2) Author, (3) Genre: ", 3)? {
            1 => SearchField::Name,
            2 => SearchField::Author,
            _ => SearchField::Genre,
        };
        let label = match field {
            SearchField::Name => "item name",
            SearchField::Author => "author name",
            SearchField::Genre => "genre",
        };
        let term = self
            .prompt
            .text(&format!("Enter the {label} (partial match allowed): "))?;

        let results = self.engine.search_items(field, &term).await?;
        if results.is_empty() {
            return self
                .prompt
                .error("No item found matching your search input :(");
        }

        if results.available.is_empty() {
            self.prompt.line("\nNo available items found.")?;
        } else {
            self.prompt.success("Available Items:")?;
            for item in &results.available {
                self.prompt.line(&item_line(item))?;
            }
        }
        if results.unavailable.is_empty() {
            self.prompt.line("\nNo unavailable items found.")?;
        } else {
            self.prompt.notice("Unavailable Items:")?;
            for item in &results.unavailable {
                self.prompt.line(&item_line(item))?;
            }
        }
        Ok(())
    }

    async fn borrow_item(&mut self, email: &str) -> Result<()> {
        let item_id = self.prompt.id("Enter the item ID: ")?;
        let receipt = self
            .engine
            .borrow_item(email, item_id, (self.today)())
            .await?;
        self.prompt
            .success(&format!("Success! You borrowed '{}'.", receipt.item_name))?;
        self.prompt
            .line(&format!("Return Date: {}", receipt.return_date))
    }

    async fn return_item(&mut self, email: &str) -> Result<()> {
        let loans = self.engine.borrowed_items(email).await?;
        if loans.is_empty() {
            return self.prompt.error("You have no borrowed items.");
        }

        self.prompt.line("\nYour borrowed items:")?;
        for loan in &loans {
            self.prompt.line(&format!(
                "- {}: {} (due {})",
                loan.item_id, loan.item_name, loan.due_date
            ))?;
        }
        let item_id = self
            .prompt
            .id("\nEnter the item ID of the item you want to return: ")?;
        let receipt = self
            .engine
            .return_item(email, item_id, (self.today)())
            .await?;
        self.prompt
            .success(&format!("Success! You returned '{}'.", receipt.item_name))
    }

    async fn donate_item(&mut self) -> Result<()> {
        let name = self.prompt.text("Enter the item name: ")?;
        let author = self.prompt.text("Enter the author: ")?;
        let category = self
            .prompt
            .text("Enter the category (e.g. Book, DVD, Magazine): ")?;
        let genre = self.prompt.text("Enter the genre: ")?;

        let item = self
            .engine
            .donate_item(&name, &author, &category, &genre)
            .await?;
        self.prompt.success(&format!(
            "Successfully donated the item: '{}' by {}.",
            item.name, item.author
        ))?;
        self.prompt.line(&format!(
            "It is now available in the library with ItemID {}!",
            item.id
        ))
    }

    async fn list_events(&mut self) -> Result<()> {
        let calendar = self.engine.events((self.today)()).await?;
        if calendar.upcoming.is_empty() && calendar.past.is_empty() {
            return self.prompt.error("No events found.");
        }
        self.event_table("Upcoming Events", &calendar.upcoming)?;
        self.event_table("Past Events", &calendar.past)
    }

    fn event_table(&mut self, title: &str, events: &[Event]) -> Result<()> {
        if events.is_empty() {
            return self
                .prompt
                .line(&format!("\nNo {} found.", title.to_lowercase()));
        }
        let rule = "-".repeat(90);
        self.prompt.line(&format!("\n{title}"))?;
        self.prompt.line(&rule)?;
        self.prompt.line(&format!(
            "{:<5} {:<25} {:<10} {:<12} {:<6} {}",
            "ID", "Event Name", "Time", "Date", "Room", "Audience"
        ))?;
        self.prompt.line(&rule)?;
        for event in events {
            self.prompt.line(&format!(
                "{:<5} {:<25} {:<10} {:<12} {:<6} {}",
                event.id,
                event.name,
                event.scheduled_time.format("%H:%M"),
                event.scheduled_date,
                room_label(event.room),
                event.audience
            ))?;
        }
        self.prompt.line(&rule)
    }

    async fn register_event(&mut self, email: &str) -> Result<()> {
        let event_id = self
            .prompt
            .id("\nEnter the Event ID you want to register for: ")?;
        let event = self.engine.event_details(event_id).await?;

        self.prompt.line("\nEvent Details:")?;
        self.prompt.line(&format!("Name: {}", event.name))?;
        self.prompt.line(&format!(
            "Scheduled Time: {}",
            event.scheduled_time.format("%H:%M")
        ))?;
        self.prompt
            .line(&format!("Scheduled Date: {}", event.scheduled_date))?;
        self.prompt
            .line(&format!("Target Audience: {}", event.audience))?;
        self.prompt
            .line(&format!("Room Number: {}", room_label(event.room)))?;

        let event = self
            .engine
            .register_for_event(email, event_id, (self.today)())
            .await?;
        self.prompt.success(&format!(
            "Success! You are now registered for '{}' on {} at {} (room {}).",
            event.name,
            event.scheduled_date,
            event.scheduled_time.format("%H:%M"),
            room_label(event.room)
        ))
    }

    async fn volunteer(&mut self, email: &str) -> Result<()> {
        self.prompt.line("\nBecome a Library Volunteer!")?;
        let since = self.engine.volunteer(email, (self.today)()).await?;
        self.prompt.success(&format!(
            "Thank you! You are now registered as a library volunteer starting from {since}."
        ))
    }

    async fn ask_librarian(&mut self, email: &str) -> Result<()> {
        loop {
            self.prompt.heading("Ask the Librarian:")?;
            for (n, label) in LIBRARIAN_MENU.iter().enumerate() {
                self.prompt.line(&format!("{}. {label}", n + 1))?;
            }
            let choice = self
                .prompt
                .choice("\nEnter the number of your choice: ", LIBRARIAN_MENU.len())?;

            let outcome = match choice {
                1 => self.apply_staff(email).await,
                2 => self.check_fines(email).await,
                3 => self.pay_fines(email).await,
                4 => self.recommend_events(email).await,
                _ => return self.prompt.line("\nExiting Ask a Librarian."),
            };
            if !self.settle(outcome)? {
                return Err(AppError::InputClosed);
            }
        }
    }

    async fn apply_staff(&mut self, email: &str) -> Result<()> {
        self.prompt.line("\nHow to Apply as a Librarian:")?;
        let start = self
            .prompt
            .date("Enter your employment start date (YYYY-MM-DD): ")?;

        self.prompt.line("\nAvailable Positions:")?;
        for (n, position) in Position::ALL.iter().enumerate() {
            self.prompt.line(&format!(
                "{}. {} - ${}/year",
                n + 1,
                position.as_str(),
                position.yearly_wage()
            ))?;
        }
        let choice = self.prompt.choice(
            "\nEnter the number corresponding to your chosen position: ",
            Position::ALL.len(),
        )?;
        let position = Position::ALL[choice - 1];

        let hired = self.engine.apply_staff(email, start, position).await?;
        self.prompt.success(&format!(
            "Application successful! You are now a {} earning ${}/year.",
            hired.position.as_str(),
            hired.wage
        ))
    }

    async fn check_fines(&mut self, email: &str) -> Result<()> {
        let total = self.engine.outstanding_fines(email).await?;
        if total.is_zero() {
            self.prompt.success("You have no fines!")
        } else {
            self.prompt
                .notice(&format!("You have outstanding fines totaling {total}."))
        }
    }

    async fn pay_fines(&mut self, email: &str) -> Result<()> {
        self.prompt.line("\nPay Your Fines!")?;
        let total = self.engine.outstanding_fines(email).await?;
        if total.is_zero() {
            return self.prompt.success("No fines to pay!");
        }
        self.prompt
            .line(&format!("\nYour total outstanding fine is: {total}"))?;

        for _ in 0..self.max_attempts {
            let amount = self
                .prompt
                .money("Enter the amount you want to pay: $")?;
            match self.engine.pay_fines(email, amount).await {
                Ok(receipt) => {
                    self.prompt.success(
                        "Payment successful! Your updated fine status has been recorded.",
                    )?;
                    if receipt.fully_paid() {
                        self.prompt.line("\n🎉 All your fines are fully paid!")?;
                    } else {
                        self.prompt
                            .line(&format!("Remaining balance: {}", receipt.remaining))?;
                    }
                    return Ok(());
                }
                Err(err) if err.kind() == ErrorKind::Payment => self.report(&err)?,
                Err(err) => return Err(err.into()),
            }
        }
        Err(AppError::TooManyAttempts)
    }

    async fn recommend_events(&mut self, email: &str) -> Result<()> {
        self.prompt
            .line("\nDiscover Events Based on Your Interests!")?;
        self.prompt
            .line("Please select a category that best suits you:")?;
        for (n, audience) in Audience::ALL.iter().enumerate() {
            self.prompt.line(&format!("{}. {audience}", n + 1))?;
        }
        let choice = self.prompt.choice(
            "\nEnter the number corresponding to your category: ",
            Audience::ALL.len(),
        )?;
        let audience = Audience::ALL[choice - 1];

        let events = self.engine.events_for_audience(audience).await?;
        if events.is_empty() {
            return self
                .prompt
                .error("No events found for your selected category.");
        }
        self.prompt.line(&format!("\nEvents for '{audience}':"))?;
        for event in &events {
            self.prompt.line(&format!(
                "\nEvent ID: {}\nName: {}\nDate: {}\nTime: {}",
                event.id,
                event.name,
                event.scheduled_date,
                event.scheduled_time.format("%H:%M")
            ))?;
        }

        while self
            .prompt
            .yes_no("\nWould you like to sign up for an event? (y/n): ")?
        {
            let outcome = self.register_event(email).await;
            if !self.settle(outcome)? {
                return Err(AppError::InputClosed);
            }
        }
        self.prompt.line("\nNo problem! Enjoy your day.")
    }
}

fn item_line(item: &Item) -> String {
    format!(
        "ItemID: {}, Name: {}, Author: {}, Category: {}, Genre: {}, Status: {}",
        item.id,
        item.name,
        item.author,
        item.category,
        item.genre,
        item.status.as_str()
    )
}

fn room_label(room: Option<i32>) -> String {
    room.map_or_else(|| "N/A".to_string(), |r| r.to_string())
}

/// Engine messages start lowercase; turn them into a sentence.
fn sentence(err: &EngineError) -> String {
    let msg = err.to_string();
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => msg,
    }
}
