use crate::models::{Contact, ContactInput};

/// Draft contact held by the form. `editing_id` toggles the two modes:
/// set means submission updates that record, unset means it creates.
#[derive(Debug, Default)]
pub struct ContactForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub country: String,
    editing_id: Option<String>,
}

impl ContactForm {
    /// Copy a contact's fields into the draft and mark it as the target.
    pub fn begin_edit(&mut self, contact: &Contact) {
        self.name = contact.name.clone();
        self.phone = contact.phone.clone();
        self.email = contact.email.clone();
        self.city = contact.city.clone();
        self.country = contact.country.clone();
        self.editing_id = Some(contact.id.clone());
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Snapshot of the draft for submission.
    pub fn input(&self) -> ContactInput {
        ContactInput {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
        }
    }

    pub fn set_input(&mut self, input: ContactInput) {
        self.name = input.name;
        self.phone = input.phone;
        self.email = input.email;
        self.city = input.city;
        self.country = input.country;
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.phone.is_empty()
            && self.email.is_empty()
            && self.city.is_empty()
            && self.country.is_empty()
            && self.editing_id.is_none()
    }

    /// Reset every field and drop the editing target.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Abandon edit mode without any network call.
    pub fn cancel_edit(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        Contact {
            id: "c1".to_string(),
            name: "Jo".to_string(),
            phone: "555".to_string(),
            email: "jo@x.com".to_string(),
            city: "NY".to_string(),
            country: "US".to_string(),
        }
    }

    #[test]
    fn begin_edit_copies_fields_and_sets_target() {
        let mut form = ContactForm::default();
        form.begin_edit(&contact());
        assert!(form.is_editing());
        assert_eq!(form.editing_id(), Some("c1"));
        assert_eq!(form.input().city, "NY");
    }

    #[test]
    fn cancel_edit_resets_everything() {
        let mut form = ContactForm::default();
        form.begin_edit(&contact());
        form.cancel_edit();
        assert!(form.is_empty());
        assert!(!form.is_editing());
    }

    #[test]
    fn draft_without_target_means_create_mode() {
        let mut form = ContactForm::default();
        form.name = "Jo".to_string();
        assert!(!form.is_editing());
    }
}
