//! # ragkit Schema
//!
//! Declarative output schemas for structured model replies.
//!
//! ## Overview
//!
//! A structured-output request asks the model to answer with JSON of a
//! given shape. This crate describes that shape as an explicit tree of
//! tagged field kinds, converts it to the JSON Schema sent with the
//! request, and checks the reply against it before it is deserialized.
//!
//! ## Schema Definition
//!
//! ```rust
//! use ragkit_schema::{Field, FieldKind, OutputSchema};
//! use serde_json::json;
//!
//! let schema = OutputSchema::new("ticket_triage")
//!     .field(Field::enumeration("priority", ["low", "medium", "high"]))
//!     .field(Field::string("summary"))
//!     .field(Field::array("labels", FieldKind::String));
//! schema.validate_definition().unwrap();
//!
//! let reply = json!({ "priority": "high", "summary": "Login broken", "labels": ["auth"] });
//! assert!(schema.validate(&reply).is_ok());
//! ```
//!
//! ## Request Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Schema    │────>│ JSON Schema │────>│    Model    │
//! │  (fields)   │     │  (strict)   │     │   (reply)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                                        │
//!       │              ┌─────────────┐           │
//!       └─────────────>│  Validator  │<──────────┘
//!                      │ (violations)│
//!                      └─────────────┘
//! ```

pub mod json_schema;
pub mod schema;
pub mod validate;

pub use schema::{Field, FieldKind, OutputSchema, SchemaError};
pub use validate::{ValidationErrors, Violation};
