use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Result;
use tracing::error;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::form::ContactForm;
use crate::models::Contact;
use crate::notify::Notifier;
use crate::session::SessionManager;

/// Dashboard state: the active session, the repository client, the form
/// draft, the last fetched collection, and the coarse busy flag that
/// refuses mutating actions while a request is in flight.
pub struct Dashboard<N: Notifier> {
    session: SessionManager,
    api: ApiClient,
    form: ContactForm,
    contacts: Vec<Contact>,
    busy: bool,
    notifier: N,
}

impl<N: Notifier> Dashboard<N> {
    /// Gate: the dashboard is only reachable with a restorable session;
    /// without one the caller must send the user back to login.
    pub fn enter(
        mut session: SessionManager,
        mut api: ApiClient,
        notifier: N,
    ) -> Result<Self, ApiError> {
        let Some(user) = session.restore() else {
            notifier.error("Please login to access the dashboard");
            return Err(ApiError::Unauthorized);
        };
        let email = user.email.clone();
        api.set_token(session.token().map(str::to_string));
        notifier.info(&format!("Logged in as: {email}"));
        Ok(Self {
            session,
            api,
            form: ContactForm::default(),
            contacts: Vec::new(),
            busy: false,
            notifier,
        })
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn form_mut(&mut self) -> &mut ContactForm {
        &mut self.form
    }

    fn begin_op(&mut self) -> Result<(), ApiError> {
        if self.busy {
            let message = "Please wait for the current action to complete.";
            self.notifier.error(message);
            return Err(ApiError::Validation(message.to_string()));
        }
        self.busy = true;
        Ok(())
    }

    /// A fetch that lands after logout has cleared the session must not
    /// repopulate the collection.
    fn apply_fetched(&mut self, contacts: Vec<Contact>) {
        if self.session.is_authenticated() {
            self.contacts = contacts;
        }
    }

    async fn fetch(&mut self) -> Result<(), ApiError> {
        match self.api.list().await {
            Ok(contacts) => {
                self.apply_fetched(contacts);
                Ok(())
            }
            Err(err) => {
                error!("fetch contacts: {err}");
                self.notifier.error(&err.to_string());
                Err(err)
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.begin_op()?;
        let result = self.fetch().await;
        self.busy = false;
        result
    }

    /// Copy the listed contact at `index` into the draft and switch the
    /// form to edit mode.
    pub fn begin_edit(&mut self, index: usize) -> bool {
        let Some(contact) = self.contacts.get(index) else {
            return false;
        };
        let contact = contact.clone();
        self.form.begin_edit(&contact);
        self.notifier
            .info("Editing contact - adjust the fields and submit to save");
        true
    }

    pub fn cancel_edit(&mut self) {
        self.form.cancel_edit();
        self.notifier.info("Edit canceled");
    }

    /// Update when an edit target is set, create otherwise. Success clears
    /// the draft and refreshes the collection exactly once; failure leaves
    /// the draft untouched so the user may retry.
    pub async fn submit(&mut self) -> Result<(), ApiError> {
        self.begin_op()?;
        let input = self.form.input();
        let result = match self.form.editing_id() {
            Some(id) => self
                .api
                .update(id, &input)
                .await
                .map(|_| "Contact updated successfully!"),
            None => self
                .api
                .create(&input)
                .await
                .map(|_| "New contact added successfully!"),
        };
        let outcome = match result {
            Ok(message) => {
                self.form.clear();
                self.notifier.success(message);
                self.fetch().await
            }
            Err(err) => {
                error!("save contact: {err}");
                self.notifier.error(&err.to_string());
                Err(err)
            }
        };
        self.busy = false;
        outcome
    }

    /// Destructive; callers must have obtained affirmative confirmation
    /// before invoking this.
    pub async fn remove(&mut self, id: &str) -> Result<(), ApiError> {
        self.begin_op()?;
        let outcome = match self.api.delete(id).await {
            Ok(()) => {
                self.notifier.success("Contact deleted successfully!");
                self.fetch().await
            }
            Err(err) => {
                error!("delete contact {id}: {err}");
                self.notifier.error(&err.to_string());
                Err(err)
            }
        };
        self.busy = false;
        outcome
    }

    /// Clears persisted and in-memory session state; the clearing is never
    /// skipped, whatever the caller does with notices and navigation
    /// afterwards.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        self.begin_op()?;
        let result = self.session.logout(&mut self.api);
        self.contacts.clear();
        self.form.clear();
        self.busy = false;
        match result {
            Ok(()) => {
                self.notifier.success("Logged out successfully!");
                Ok(())
            }
            Err(err) => {
                error!("clear session: {err}");
                self.notifier
                    .error("Logged out, but the local session file could not be removed");
                Err(ApiError::Http(err.to_string()))
            }
        }
    }

    pub fn render(&self) {
        if self.contacts.is_empty() {
            println!("No contacts found. Add your first contact!");
            return;
        }
        for (index, contact) in self.contacts.iter().enumerate() {
            println!(
                "{:>3}. {}  {}  {}  {}, {}",
                index + 1,
                contact.name,
                contact.phone,
                contact.email,
                contact.city,
                contact.country
            );
        }
    }

    /// Line-oriented dashboard: fetch and show the list on entry, then
    /// read commands until `quit` or `logout`.
    pub async fn run(&mut self) -> Result<()> {
        // A failed initial fetch is already notified; stay on the dashboard.
        let _ = self.refresh().await;
        self.render();
        print_help();

        loop {
            let Some(line) = read_command()? else {
                break;
            };
            let mut parts = line.split_whitespace();
            match parts.next() {
                None => continue,
                Some("list") => {
                    if self.refresh().await.is_ok() {
                        self.render();
                    }
                }
                Some("add") => {
                    // A draft preserved from a failed create becomes the
                    // prompt defaults; an abandoned edit does not.
                    if self.form.is_editing() {
                        self.form.clear();
                    }
                    self.fill_form_from_prompts()?;
                    if self.submit().await.is_ok() {
                        self.render();
                    }
                }
                Some("edit") => {
                    let index = parts.next().and_then(|raw| raw.parse::<usize>().ok());
                    match index {
                        Some(n) if n >= 1 && n <= self.contacts.len() => {
                            self.begin_edit(n - 1);
                            self.fill_form_from_prompts()?;
                            if self.submit().await.is_ok() {
                                self.render();
                            }
                        }
                        _ => self.notifier.error("No such contact number"),
                    }
                }
                Some("cancel") => {
                    if self.form.is_editing() {
                        self.cancel_edit();
                    } else {
                        self.notifier.info("Nothing to cancel");
                    }
                }
                Some("delete") => {
                    let index = parts.next().and_then(|raw| raw.parse::<usize>().ok());
                    match index {
                        Some(n) if n >= 1 && n <= self.contacts.len() => {
                            let id = self.contacts[n - 1].id.clone();
                            if confirm("Are you sure you want to delete this contact?")?
                                && self.remove(&id).await.is_ok()
                            {
                                self.render();
                            }
                        }
                        _ => self.notifier.error("No such contact number"),
                    }
                }
                Some("logout") => {
                    let _ = self.logout();
                    // Leave the confirmation notice on screen for a beat
                    // before dropping back to the shell.
                    tokio::time::sleep(Duration::from_millis(1000)).await;
                    break;
                }
                Some("help") => print_help(),
                Some("quit") | Some("exit") => {
                    if !self.form.is_empty() {
                        self.notifier.info("Discarding unsaved draft");
                    }
                    break;
                }
                Some(other) => self.notifier.error(&format!("Unknown command: {other}")),
            }
        }
        Ok(())
    }

    fn fill_form_from_prompts(&mut self) -> io::Result<()> {
        self.form.name = prompt_field("Name", &self.form.name)?;
        self.form.phone = prompt_field("Phone", &self.form.phone)?;
        self.form.email = prompt_field("Email", &self.form.email)?;
        self.form.city = prompt_field("City", &self.form.city)?;
        self.form.country = prompt_field("Country", &self.form.country)?;
        Ok(())
    }

    #[cfg(test)]
    fn force_busy(&mut self) {
        self.busy = true;
    }
}

fn print_help() {
    println!("Commands: list, add, edit <n>, delete <n>, cancel, logout, help, quit");
}

fn read_command() -> io::Result<Option<String>> {
    print!("contactly> ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Blank input keeps the current value, so editing only what changed is a
/// matter of pressing enter through the rest.
fn prompt_field(label: &str, current: &str) -> io::Result<String> {
    if current.is_empty() {
        print!("{label}: ");
    } else {
        print!("{label} [{current}]: ");
    }
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().lock().read_line(&mut value)?;
    let value = value.trim();
    Ok(if value.is_empty() {
        current.to_string()
    } else {
        value.to_string()
    })
}

pub(crate) fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
