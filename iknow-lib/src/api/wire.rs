//! Response envelopes.
//!
//! The API wraps every list in an object (`{"schools": [...]}`). A list field
//! that is missing, null or not an array decodes to `None` instead of failing
//! the whole response.

use serde::Deserialize;
use serde::Deserializer;
use serde::de::DeserializeOwned;
use serde::de::Error as _;
use serde_json::Value;

use super::Page;
use crate::model::Comment;
use crate::model::Department;
use crate::model::Exam;
use crate::model::School;
use crate::model::University;

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect::<Result<Vec<T>, _>>()
            .map(Some),
        _ => Ok(None),
    }
}

/// JavaScript-style truthiness of a continuation field.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn explicit_signal(next_page: Option<&Value>, has_more: Option<&Value>) -> Option<bool> {
    match (next_page, has_more) {
        (None, None) => None,
        (a, b) => Some(a.is_some_and(truthy) || b.is_some_and(truthy)),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UniversitiesEnvelope {
    #[serde(default, deserialize_with = "lenient_list")]
    pub universities: Option<Vec<University>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchoolsEnvelope {
    #[serde(default, deserialize_with = "lenient_list")]
    pub schools: Option<Vec<School>>,
    #[serde(default)]
    pub next_page: Option<Value>,
    #[serde(default)]
    pub has_more: Option<Value>,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl SchoolsEnvelope {
    /// Converts to a page, or `None` when the body held no school list.
    pub fn into_page(self, number: u32) -> Option<Page<School>> {
        let signal = explicit_signal(self.next_page.as_ref(), self.has_more.as_ref());
        let mut page = Page::new(number, self.schools?);
        if let Some(has_more) = signal {
            page = page.with_has_more(has_more);
        }
        if let Some(page_size) = self.page_size.filter(|size| *size > 0) {
            page = page.with_page_size(page_size);
        }
        Some(page)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DepartmentsEnvelope {
    #[serde(default, deserialize_with = "lenient_list")]
    pub departments: Option<Vec<Department>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExamsEnvelope {
    #[serde(default, deserialize_with = "lenient_list")]
    pub exams: Option<Vec<Exam>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepliesEnvelope {
    #[serde(default, deserialize_with = "lenient_list")]
    pub replies: Option<Vec<Comment>>,
    #[serde(default)]
    pub has_more: Option<Value>,
}

impl RepliesEnvelope {
    pub fn into_page(self, number: u32) -> Page<Comment> {
        let has_more = self.has_more.as_ref().is_some_and(truthy);
        Page::new(number, self.replies.unwrap_or_default()).with_has_more(has_more)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReplyCreatedEnvelope {
    #[serde(default)]
    pub reply: Option<Comment>,
}
