use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
	Click,
	Bookmark,
}
impl InteractionKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Click => "click",
			Self::Bookmark => "bookmark",
		}
	}
}
