//! Lesson 3: structured extraction from free text

use super::rule;
use ragkit_llm::{structured_response, Result, TextGenerator};
use ragkit_schema::{Field, FieldKind, OutputSchema};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

pub const SCHEMA_NAME: &str = "customer_feedback_analysis";

pub const CUSTOMER_EMAIL: &str = "The course is ok, though the instructor is not very good.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Bug,
    FeatureRequest,
    Complaint,
    Praise,
    Question,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Bug,
        Category::FeatureRequest,
        Category::Complaint,
        Category::Praise,
        Category::Question,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Bug => "bug",
            Category::FeatureRequest => "feature_request",
            Category::Complaint => "complaint",
            Category::Praise => "praise",
            Category::Question => "question",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the model extracts from one piece of feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFeedback {
    pub sentiment: Sentiment,
    pub priority: Priority,
    pub category: Category,
    pub summary: String,
    pub action_items: Vec<String>,
    pub customer_name: String,
}

/// Schema matching [`CustomerFeedback`]
pub fn feedback_schema() -> OutputSchema {
    OutputSchema::new(SCHEMA_NAME)
        .describe("Structured analysis of a piece of customer feedback")
        .field(Field::enumeration("sentiment", Sentiment::ALL.iter().map(|s| s.as_str())))
        .field(Field::enumeration("priority", Priority::ALL.iter().map(|p| p.as_str())))
        .field(Field::enumeration("category", Category::ALL.iter().map(|c| c.as_str())))
        .field(Field::string("summary").describe("One or two sentences"))
        .field(Field::array("action_items", FieldKind::String))
        .field(Field::string("customer_name").describe("Name from the signature or context"))
}

pub fn analysis_prompt(email: &str) -> String {
    format!(
        "Analyze this customer feedback and extract structured information:\n\n\
         {}\n\n\
         Extract the sentiment, priority level, category, summary, action items, and customer name.\n\
         If customer name is not explicitly mentioned, extract it from email signatures or infer from context.",
        email.trim()
    )
}

pub fn render(analysis: &CustomerFeedback, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "📊 Structured Analysis Results:")?;
    writeln!(out, "{}", rule('═', 50))?;
    writeln!(out, "🎭 Sentiment: {}", analysis.sentiment.as_str().to_uppercase())?;
    writeln!(out, "⚠️  Priority: {}", analysis.priority.as_str().to_uppercase())?;
    writeln!(out, "📂 Category: {}", analysis.category)?;
    writeln!(out, "👤 Customer: {}", analysis.customer_name)?;
    writeln!(out, "📝 Summary: {}", analysis.summary)?;
    writeln!(out, "🔧 Action Items:")?;
    for (i, item) in analysis.action_items.iter().enumerate() {
        writeln!(out, "   {}. {}", i + 1, item)?;
    }
    writeln!(out, "{}", rule('═', 50))
}

pub async fn run<G>(generator: &G, out: &mut (dyn Write + Send)) -> Result<CustomerFeedback>
where
    G: TextGenerator + ?Sized,
{
    writeln!(out, "🎯 Lesson 3: Smart JSON with output schemas")?;
    writeln!(out, "📧 Analyzing customer feedback for structured insights...\n")?;
    writeln!(out, "📬 Customer Email:")?;
    writeln!(out, "{}", rule('─', 60))?;
    writeln!(out, "{}", CUSTOMER_EMAIL)?;
    writeln!(out, "{}", rule('─', 60))?;
    writeln!(out, "\n🤖 AI Analysis (Structured JSON):\n")?;

    let analysis: CustomerFeedback =
        structured_response(generator, &analysis_prompt(CUSTOMER_EMAIL), &feedback_schema()).await?;

    render(&analysis, out)?;
    writeln!(out, "\n✅ Reply validated against the schema before decoding")?;
    writeln!(out, "\n🎯 Next: search your own documents with RAG (ragkit rag)")?;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "sentiment": "neutral",
            "priority": "medium",
            "category": "complaint",
            "summary": "Course is acceptable but the instructor is weak.",
            "action_items": ["Review instructor performance", "Collect more feedback"],
            "customer_name": "Unknown"
        })
    }

    #[test]
    fn test_schema_definition_is_valid() {
        let schema = feedback_schema();
        assert!(schema.validate_definition().is_ok());
        assert_eq!(schema.fields.len(), 6);
    }

    #[test]
    fn test_schema_enums_match_serde_names() {
        let schema = feedback_schema();
        for category in Category::ALL {
            let encoded = serde_json::to_value(category).unwrap();
            let field = schema.get_field("category").unwrap();
            let FieldKind::Enum { values } = &field.kind else {
                panic!("category is not an enum");
            };
            assert!(values.iter().any(|v| encoded == json!(v)));
        }
    }

    #[test]
    fn test_sample_reply_validates_and_decodes() {
        let value = sample();
        feedback_schema().validate(&value).unwrap();

        let feedback: CustomerFeedback = serde_json::from_value(value).unwrap();
        assert_eq!(feedback.category, Category::Complaint);
        assert_eq!(feedback.action_items.len(), 2);
    }

    #[test]
    fn test_render() {
        let feedback: CustomerFeedback = serde_json::from_value(sample()).unwrap();
        let mut out = Vec::<u8>::new();
        render(&feedback, &mut out).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Sentiment: NEUTRAL"));
        assert!(printed.contains("Priority: MEDIUM"));
        assert!(printed.contains("Category: complaint"));
        assert!(printed.contains("   2. Collect more feedback"));
    }

    #[test]
    fn test_prompt_embeds_email() {
        let prompt = analysis_prompt("  Hello, the app crashes. - Sam  ");
        assert!(prompt.contains("Hello, the app crashes. - Sam\n"));
        assert!(prompt.contains("customer name"));
    }
}
