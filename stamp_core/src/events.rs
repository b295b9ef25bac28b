use std::fmt;

use serde::Serialize;

/// Something that happened while a [`ContentUpdater`](crate::ContentUpdater)
/// processed content. Events are emitted in processing order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum UpdateEvent {
	/// A replacer pass is starting.
	Trying { pattern: String, value: String },
	/// A replacer pass found `count` matches.
	MatchesFound { pattern: String, count: usize },
	/// A replacer pass found nothing to replace.
	NoMatches { pattern: String },
	/// A named group references a variable that is not registered.
	UnregisteredVariable {
		name: String,
		available: Vec<String>,
	},
	/// A captured value was replaced inside a matched line.
	LineModified {
		variable_name: String,
		old_value: String,
		new_value: String,
	},
	/// A matched line was written back into the content.
	LineConverted { from: String, to: String },
}

/// Severity of an [`UpdateEvent`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EventLevel {
	Info,
	Warn,
}

impl UpdateEvent {
	pub fn level(&self) -> EventLevel {
		match self {
			Self::NoMatches { .. } | Self::UnregisteredVariable { .. } => EventLevel::Warn,
			Self::Trying { .. }
			| Self::MatchesFound { .. }
			| Self::LineModified { .. }
			| Self::LineConverted { .. } => EventLevel::Info,
		}
	}

	pub fn is_warning(&self) -> bool {
		self.level() == EventLevel::Warn
	}
}

impl fmt::Display for UpdateEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Trying { pattern, value } => {
				write!(f, "trying to replace '/{pattern}/' with '{value}'")
			}
			Self::MatchesFound { count, .. } => write!(f, "found {count} matches, replacing"),
			Self::NoMatches { pattern } => write!(f, "no matches found for '/{pattern}/'"),
			Self::UnregisteredVariable { name, available } => {
				write!(
					f,
					"you are referencing variable '{name}' but this is not registered. Only [{}] \
					 are available. Maybe you've misspelled the variable name?",
					available.join(", ")
				)
			}
			Self::LineModified {
				variable_name,
				old_value,
				new_value,
			} => write!(f, "{variable_name}: '{old_value}' -> '{new_value}'"),
			Self::LineConverted { from, to } => write!(f, "converted line '{from}' to '{to}'"),
		}
	}
}

/// Receives the events emitted by a [`ContentUpdater`](crate::ContentUpdater).
pub trait EventSink {
	fn emit(&mut self, event: UpdateEvent);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
	fn emit(&mut self, event: UpdateEvent) {
		(**self).emit(event);
	}
}

impl EventSink for Vec<UpdateEvent> {
	fn emit(&mut self, event: UpdateEvent) {
		self.push(event);
	}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
	fn emit(&mut self, event: UpdateEvent) {
		match &event {
			UpdateEvent::LineModified {
				variable_name,
				old_value,
				new_value,
			} => {
				tracing::info!(
					variable = %variable_name,
					old_value = %old_value,
					new_value = %new_value,
					"line modified"
				);
			}
			event if event.is_warning() => tracing::warn!("{event}"),
			event => tracing::info!("{event}"),
		}
	}
}

/// Keeps every event in order, optionally forwarding each one to another
/// sink as it arrives.
#[derive(Debug, Default)]
pub struct RecordingSink<S = ()> {
	events: Vec<UpdateEvent>,
	forward: S,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}
}

impl<S: EventSink> RecordingSink<S> {
	pub fn forwarding_to(forward: S) -> Self {
		Self {
			events: Vec::new(),
			forward,
		}
	}
}

impl<S> RecordingSink<S> {
	pub fn events(&self) -> &[UpdateEvent] {
		&self.events
	}

	pub fn into_events(self) -> Vec<UpdateEvent> {
		self.events
	}

	/// Only the [`UpdateEvent::LineModified`] events.
	pub fn modifications(&self) -> impl Iterator<Item = &UpdateEvent> {
		self.events
			.iter()
			.filter(|event| matches!(event, UpdateEvent::LineModified { .. }))
	}

	pub fn warnings(&self) -> impl Iterator<Item = &UpdateEvent> {
		self.events.iter().filter(|event| event.is_warning())
	}
}

impl<S: EventSink> EventSink for RecordingSink<S> {
	fn emit(&mut self, event: UpdateEvent) {
		self.forward.emit(event.clone());
		self.events.push(event);
	}
}

impl EventSink for () {
	fn emit(&mut self, _event: UpdateEvent) {}
}
