//! # Bot State
//!
//! In-memory per-conversation state: the multi-step event creation form.
//! Keyed by (room, sender) so concurrent conversations never interfere.
//! The form itself is a tagged enum, one variant per step, carrying the
//! fields collected so far; persistence only happens at the terminal step.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

use crate::domain::models::NewEvent;
use crate::strings::messages;

/// (room id, sender id)
pub type FormKey = (String, String);

#[derive(Debug, Default)]
pub struct BotState {
    forms: HashMap<FormKey, EventForm>,
}

impl BotState {
    pub fn active_form(&self, key: &FormKey) -> Option<EventForm> {
        self.forms.get(key).cloned()
    }

    pub fn set_form(&mut self, key: FormKey, form: EventForm) {
        self.forms.insert(key, form);
    }

    pub fn clear_form(&mut self, key: &FormKey) {
        self.forms.remove(key);
    }
}

/// The admin event-creation form. Strictly linear; each variant is one
/// step and owns everything collected before it.
#[derive(Debug, Clone, PartialEq)]
pub enum EventForm {
    Title,
    Description {
        title: String,
    },
    StartTime {
        title: String,
        description: Option<String>,
    },
    Duration {
        title: String,
        description: Option<String>,
        start_time: DateTime<Utc>,
    },
    Price {
        title: String,
        description: Option<String>,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
    },
    MaxViewers {
        title: String,
        description: Option<String>,
        start_time: DateTime<Utc>,
        duration_minutes: i32,
        price: Decimal,
    },
}

/// Result of feeding one input line into the form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormAdvance {
    Next(EventForm),
    Complete(NewEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("invalid date, expected DD.MM.YYYY HH:MM")]
    BadDate,
    #[error("expected a number")]
    BadNumber,
    #[error("expected a number or '-'")]
    BadNumberOrSkip,
}

/// Sentinel meaning "use the default / omit" at optional steps.
const SKIP: &str = "-";

const DEFAULT_DURATION_MINUTES: i32 = 120;

impl EventForm {
    /// The prompt to show when entering this step.
    pub fn prompt(&self) -> &'static str {
        match self {
            EventForm::Title => messages::FORM_STEP_TITLE,
            EventForm::Description { .. } => messages::FORM_STEP_DESCRIPTION,
            EventForm::StartTime { .. } => messages::FORM_STEP_START_TIME,
            EventForm::Duration { .. } => messages::FORM_STEP_DURATION,
            EventForm::Price { .. } => messages::FORM_STEP_PRICE,
            EventForm::MaxViewers { .. } => messages::FORM_STEP_MAX_VIEWERS,
        }
    }

    /// Feed one line of input into the form. On a validation error the
    /// caller keeps the current step; there is no cancel transition.
    pub fn apply(&self, input: &str) -> Result<FormAdvance, FormError> {
        let input = input.trim();

        match self.clone() {
            EventForm::Title => Ok(FormAdvance::Next(EventForm::Description {
                title: input.to_string(),
            })),

            EventForm::Description { title } => {
                let description = if input == SKIP {
                    None
                } else {
                    Some(input.to_string())
                };
                Ok(FormAdvance::Next(EventForm::StartTime { title, description }))
            }

            EventForm::StartTime { title, description } => {
                let start_time = parse_start_time(input)?;
                Ok(FormAdvance::Next(EventForm::Duration {
                    title,
                    description,
                    start_time,
                }))
            }

            EventForm::Duration {
                title,
                description,
                start_time,
            } => {
                let duration_minutes = if input == SKIP {
                    DEFAULT_DURATION_MINUTES
                } else {
                    input.parse().map_err(|_| FormError::BadNumber)?
                };
                Ok(FormAdvance::Next(EventForm::Price {
                    title,
                    description,
                    start_time,
                    duration_minutes,
                }))
            }

            EventForm::Price {
                title,
                description,
                start_time,
                duration_minutes,
            } => {
                let price: Decimal = input.parse().map_err(|_| FormError::BadNumber)?;
                Ok(FormAdvance::Next(EventForm::MaxViewers {
                    title,
                    description,
                    start_time,
                    duration_minutes,
                    price,
                }))
            }

            EventForm::MaxViewers {
                title,
                description,
                start_time,
                duration_minutes,
                price,
            } => {
                let max_viewers = if input == SKIP {
                    None
                } else {
                    Some(input.parse().map_err(|_| FormError::BadNumberOrSkip)?)
                };
                Ok(FormAdvance::Complete(NewEvent {
                    title,
                    description,
                    start_time,
                    duration_minutes,
                    price,
                    max_viewers,
                }))
            }
        }
    }
}

fn parse_start_time(input: &str) -> Result<DateTime<Utc>, FormError> {
    NaiveDateTime::parse_from_str(input, messages::DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| FormError::BadDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(form: EventForm, input: &str) -> EventForm {
        match form.apply(input).expect("step should advance") {
            FormAdvance::Next(next) => next,
            FormAdvance::Complete(_) => panic!("completed too early"),
        }
    }

    #[test]
    fn test_fixed_step_order() {
        let form = EventForm::Title;
        let form = advance(form, "Hamlet");
        assert!(matches!(form, EventForm::Description { .. }));
        let form = advance(form, "A tragedy");
        assert!(matches!(form, EventForm::StartTime { .. }));
        let form = advance(form, "25.12.2024 19:00");
        assert!(matches!(form, EventForm::Duration { .. }));
        let form = advance(form, "90");
        assert!(matches!(form, EventForm::Price { .. }));
        let form = advance(form, "500");
        assert!(matches!(form, EventForm::MaxViewers { .. }));
    }

    #[test]
    fn test_full_walk_with_skips() {
        let form = EventForm::Title;
        let form = advance(form, "Hamlet");
        let form = advance(form, "-");
        let form = advance(form, "25.12.2024 19:00");
        let form = advance(form, "-");
        let form = advance(form, "500");

        let outcome = form.apply("-").unwrap();
        let FormAdvance::Complete(event) = outcome else {
            panic!("expected completion");
        };

        assert_eq!(event.title, "Hamlet");
        assert_eq!(event.description, None);
        assert_eq!(
            event.start_time,
            parse_start_time("25.12.2024 19:00").unwrap()
        );
        assert_eq!(event.duration_minutes, 120);
        assert_eq!(event.price, Decimal::from(500));
        assert_eq!(event.max_viewers, None);
    }

    #[test]
    fn test_skip_is_never_a_validation_failure_where_allowed() {
        let desc = EventForm::Description {
            title: "T".into(),
        };
        assert!(desc.apply("-").is_ok());

        let duration = EventForm::Duration {
            title: "T".into(),
            description: None,
            start_time: Utc::now(),
        };
        assert!(duration.apply("-").is_ok());

        let viewers = EventForm::MaxViewers {
            title: "T".into(),
            description: None,
            start_time: Utc::now(),
            duration_minutes: 120,
            price: Decimal::ZERO,
        };
        assert!(viewers.apply("-").is_ok());
    }

    #[test]
    fn test_invalid_date_reprompts() {
        let form = EventForm::StartTime {
            title: "T".into(),
            description: None,
        };
        assert_eq!(form.apply("next tuesday"), Err(FormError::BadDate));
        assert_eq!(form.apply("2024-12-25 19:00"), Err(FormError::BadDate));
        assert!(form.apply("25.12.2024 19:00").is_ok());
    }

    #[test]
    fn test_invalid_numbers_reprompt() {
        let duration = EventForm::Duration {
            title: "T".into(),
            description: None,
            start_time: Utc::now(),
        };
        assert_eq!(duration.apply("ninety"), Err(FormError::BadNumber));

        let price = EventForm::Price {
            title: "T".into(),
            description: None,
            start_time: Utc::now(),
            duration_minutes: 120,
        };
        assert_eq!(price.apply("free"), Err(FormError::BadNumber));
        // '-' is not a skip sentinel at the price step
        assert_eq!(price.apply("-"), Err(FormError::BadNumber));

        let viewers = EventForm::MaxViewers {
            title: "T".into(),
            description: None,
            start_time: Utc::now(),
            duration_minutes: 120,
            price: Decimal::ZERO,
        };
        assert_eq!(viewers.apply("many"), Err(FormError::BadNumberOrSkip));
    }

    #[test]
    fn test_price_accepts_decimals() {
        let price = EventForm::Price {
            title: "T".into(),
            description: None,
            start_time: Utc::now(),
            duration_minutes: 120,
        };
        let FormAdvance::Next(EventForm::MaxViewers { price, .. }) =
            price.apply("499.99").unwrap()
        else {
            panic!("expected next step");
        };
        assert_eq!(price, "499.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_conversations_are_isolated_per_key() {
        let mut state = BotState::default();
        let alice = ("!room:x".to_string(), "@alice:x".to_string());
        let bob = ("!room:x".to_string(), "@bob:x".to_string());

        state.set_form(alice.clone(), EventForm::Title);
        assert!(state.active_form(&alice).is_some());
        assert!(state.active_form(&bob).is_none());

        state.clear_form(&alice);
        assert!(state.active_form(&alice).is_none());
    }
}
