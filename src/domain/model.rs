use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(rename = "catchPhrase")]
    pub catch_phrase: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub company: Company,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub post_id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Records that can be listed in a `<select>` control.
pub trait SelectOption {
    fn option_value(&self) -> String;
    fn option_label(&self) -> &str;
}

impl SelectOption for User {
    fn option_value(&self) -> String {
        self.id.to_string()
    }

    fn option_label(&self) -> &str {
        &self.name
    }
}

/// Whether a post's comment section is currently visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CommentVisibility {
    #[default]
    Hidden,
    Shown,
}

impl CommentVisibility {
    pub fn toggled(self) -> Self {
        match self {
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        }
    }

    pub fn is_hidden(self) -> bool {
        self == Self::Hidden
    }

    /// Label of the button that would switch to the other state.
    pub fn button_label(self) -> &'static str {
        match self {
            Self::Hidden => "Show Comments",
            Self::Shown => "Hide Comments",
        }
    }
}
