use crate::core::assembler::build_posts_fragment;
use crate::core::elements::{make_option_elements, make_text_element};
use crate::domain::model::{CommentVisibility, Post, User};
use crate::domain::ports::PostSource;
use crate::dom::{
    Document, Event, EventKind, Handler, NodeId, Selector, PLACEHOLDER_OPTION, SELECT_MENU_ID,
};
use crate::utils::error::{Result, ViewerError};
use std::collections::HashMap;

pub const DEFAULT_USER_ID: u64 = 1;
pub const DEFAULT_TEXT: &str = "Select an Employee to display their posts.";

#[derive(Debug)]
pub enum InitOutcome {
    Populated { select: NodeId, users: usize },
    SelectMissing,
    FetchFailed(ViewerError),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Buttons found in `main` before it was cleared.
    pub removed_listeners: Vec<NodeId>,
    pub main: Option<NodeId>,
    /// Top-level nodes mounted into `main`.
    pub mounted: Vec<NodeId>,
    /// Buttons found in `main` after mounting.
    pub buttons: Vec<NodeId>,
}

#[derive(Debug)]
pub enum SelectionOutcome {
    Refreshed {
        user_id: u64,
        post_count: usize,
        summary: RefreshSummary,
    },
    FetchFailed {
        user_id: u64,
        error: ViewerError,
    },
}

impl SelectionOutcome {
    pub fn user_id(&self) -> u64 {
        match self {
            Self::Refreshed { user_id, .. } | Self::FetchFailed { user_id, .. } => *user_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentToggle {
    pub post_id: u64,
    pub visibility: CommentVisibility,
    pub section: Option<NodeId>,
    pub button: Option<NodeId>,
}

#[derive(Debug)]
pub enum DispatchOutcome {
    Selection(SelectionOutcome),
    Toggle(CommentToggle),
}

/// Maps the selector's value to a user id: the "Employees" prompt, an empty
/// value and anything unparsable all mean the first user.
pub fn resolve_user_id(value: Option<&str>) -> u64 {
    match value.map(str::trim) {
        None | Some("") | Some(PLACEHOLDER_OPTION) => DEFAULT_USER_ID,
        Some(raw) => match raw.parse::<u64>() {
            Ok(id) if id > 0 => id,
            _ => {
                tracing::warn!(
                    "Unrecognised selector value '{}', using user {}",
                    raw,
                    DEFAULT_USER_ID
                );
                DEFAULT_USER_ID
            }
        },
    }
}

/// Drives the page: owns the document, the post source and the per-post
/// comment visibility.
pub struct PageController<S: PostSource> {
    document: Document,
    source: S,
    comments: HashMap<u64, CommentVisibility>,
}

impl<S: PostSource> PageController<S> {
    pub fn new(source: S) -> Self {
        Self::with_document(source, Document::page_shell())
    }

    pub fn with_document(source: S, document: Document) -> Self {
        Self {
            document,
            source,
            comments: HashMap::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn comment_visibility(&self, post_id: u64) -> CommentVisibility {
        self.comments.get(&post_id).copied().unwrap_or_default()
    }

    fn main_region(&self) -> Option<NodeId> {
        self.document
            .query_selector(self.document.root(), &Selector::tag("main"))
    }

    fn select_menu(&self) -> Option<NodeId> {
        self.document.element_by_id(SELECT_MENU_ID)
    }

    fn post_id_of(&self, node: NodeId) -> Option<u64> {
        self.document.data(node, "post-id")?.parse().ok()
    }

    /// Binds the selector's change handler, then loads the user list.
    pub async fn init_app(&mut self) -> InitOutcome {
        match self.select_menu() {
            Some(select) => {
                self.document
                    .add_event_listener(select, EventKind::Change, Handler::SelectMenuChange);
            }
            None => tracing::warn!("No #{} element to bind", SELECT_MENU_ID),
        }
        self.init_page().await
    }

    pub async fn init_page(&mut self) -> InitOutcome {
        let users = match self.source.users().await {
            Ok(users) => users,
            Err(error) => return InitOutcome::FetchFailed(error),
        };
        tracing::info!("Loaded {} users", users.len());

        match self.populate_select_menu(Some(&users)) {
            Some(select) => InitOutcome::Populated {
                select,
                users: users.len(),
            },
            None => InitOutcome::SelectMissing,
        }
    }

    /// Appends one option per user to `#selectMenu`.
    pub fn populate_select_menu(&mut self, users: Option<&[User]>) -> Option<NodeId> {
        let users = users?;
        let Some(select) = self.select_menu() else {
            tracing::warn!("No #{} element to populate", SELECT_MENU_ID);
            return None;
        };
        let options = make_option_elements(&mut self.document, Some(users))?;
        self.document.append_all(select, &options).ok()?;
        Some(select)
    }

    /// Runs every handler registered for the event's target and kind.
    pub async fn dispatch(&mut self, event: Event) -> Result<Vec<DispatchOutcome>> {
        let handlers = self.document.listeners(event.target, event.kind);
        let mut outcomes = Vec::with_capacity(handlers.len());

        for handler in handlers {
            match handler {
                Handler::SelectMenuChange => {
                    if let Some(outcome) = self.select_menu_change(&event).await? {
                        outcomes.push(DispatchOutcome::Selection(outcome));
                    }
                }
                Handler::ToggleComments { post_id } => {
                    if let Some(toggle) = self.toggle_comments(post_id) {
                        outcomes.push(DispatchOutcome::Toggle(toggle));
                    }
                }
            }
        }
        Ok(outcomes)
    }

    /// Selects the option with `value` and fires the selector's change event.
    pub async fn choose_user(&mut self, value: &str) -> Result<Vec<DispatchOutcome>> {
        let select = self
            .select_menu()
            .ok_or_else(|| ViewerError::dom(format!("page has no #{}", SELECT_MENU_ID)))?;
        if !self.document.select_option(select, value)? {
            return Err(ViewerError::NotFound {
                resource: format!("option '{}' in #{}", value, SELECT_MENU_ID),
            });
        }
        self.dispatch(Event::change(select)).await
    }

    /// Clicks the comments button of `post_id`, if one is on the page.
    pub async fn click_comments_button(&mut self, post_id: u64) -> Result<Vec<DispatchOutcome>> {
        let selector = Selector::tag("button").with_data("post-id", post_id.to_string());
        let Some(button) = self.document.query_selector(self.document.root(), &selector) else {
            tracing::warn!("No element matches {}", selector);
            return Ok(Vec::new());
        };
        self.dispatch(Event::click(button)).await
    }

    pub async fn select_menu_change(&mut self, event: &Event) -> Result<Option<SelectionOutcome>> {
        if event.kind != EventKind::Change {
            return Ok(None);
        }
        let target = event.target;
        self.document.set_disabled(target, true)?;

        let value = self.document.select_value(target);
        let user_id = resolve_user_id(value.as_deref());
        let outcome = self.load_user_posts(user_id).await;

        self.document.set_disabled(target, false)?;
        outcome.map(Some)
    }

    async fn load_user_posts(&mut self, user_id: u64) -> Result<SelectionOutcome> {
        tracing::info!("Loading posts for user {}", user_id);
        match self.source.user_posts(user_id).await {
            Ok(posts) => {
                let summary = self.refresh_posts(&posts).await?;
                Ok(SelectionOutcome::Refreshed {
                    user_id,
                    post_count: posts.len(),
                    summary,
                })
            }
            Err(error) => {
                tracing::error!("Keeping current posts, user {} failed to load: {}", user_id, error);
                Ok(SelectionOutcome::FetchFailed { user_id, error })
            }
        }
    }

    /// Replaces the content of `main` with `posts` and rewires the comment
    /// buttons. Every post starts with its comments hidden.
    pub async fn refresh_posts(&mut self, posts: &[Post]) -> Result<RefreshSummary> {
        let removed_listeners = self.remove_button_listeners();
        let main = self
            .main_region()
            .and_then(|main| self.delete_child_elements(main));
        self.comments.clear();

        let mounted = self.display_posts(posts).await?.unwrap_or_default();
        let buttons = self.add_button_listeners();

        Ok(RefreshSummary {
            removed_listeners,
            main,
            mounted,
            buttons,
        })
    }

    /// Mounts the posts, or the default message when there are none. Returns
    /// the mounted top-level nodes, or `None` when the page has no `main`.
    pub async fn display_posts(&mut self, posts: &[Post]) -> Result<Option<Vec<NodeId>>> {
        let Some(main) = self.main_region() else {
            tracing::warn!("No <main> region to display posts in");
            return Ok(None);
        };

        let element = if posts.is_empty() {
            make_text_element(&mut self.document, "p", DEFAULT_TEXT, Some("default-text"))
        } else {
            build_posts_fragment(&mut self.document, &self.source, posts).await?
        };

        let mounted = if self.document.is_fragment(element) {
            self.document.children(element).to_vec()
        } else {
            vec![element]
        };
        self.document.append(main, element)?;
        tracing::debug!("Mounted {} nodes into <main>", mounted.len());

        Ok(Some(mounted))
    }

    /// Clears `parent`; `None` when it is not an element.
    pub fn delete_child_elements(&mut self, parent: NodeId) -> Option<NodeId> {
        self.document.element(parent)?;
        self.document.clear_children(parent);
        Some(parent)
    }

    fn main_buttons(&self) -> Vec<NodeId> {
        match self.main_region() {
            Some(main) => self
                .document
                .query_selector_all(main, &Selector::tag("button")),
            None => Vec::new(),
        }
    }

    pub fn add_button_listeners(&mut self) -> Vec<NodeId> {
        let buttons = self.main_buttons();
        for button in &buttons {
            if let Some(post_id) = self.post_id_of(*button) {
                self.document.add_event_listener(
                    *button,
                    EventKind::Click,
                    Handler::ToggleComments { post_id },
                );
            }
        }
        buttons
    }

    pub fn remove_button_listeners(&mut self) -> Vec<NodeId> {
        let buttons = self.main_buttons();
        for button in &buttons {
            if let Some(post_id) = self.post_id_of(*button) {
                self.document.remove_event_listener(
                    *button,
                    EventKind::Click,
                    Handler::ToggleComments { post_id },
                );
            }
        }
        buttons
    }

    /// Flips the comment visibility of `post_id` and updates its section and
    /// button. `None` for a missing id.
    pub fn toggle_comments(&mut self, post_id: u64) -> Option<CommentToggle> {
        if post_id == 0 {
            return None;
        }
        let state = self.comments.entry(post_id).or_default();
        *state = state.toggled();
        let visibility = *state;

        let section = self.sync_comment_section(post_id);
        let button = self.sync_comment_button(post_id);
        tracing::debug!("Comments for post {} now {:?}", post_id, visibility);

        Some(CommentToggle {
            post_id,
            visibility,
            section,
            button,
        })
    }

    /// Sets the `hide` class on the post's comment section from its state.
    pub fn sync_comment_section(&mut self, post_id: u64) -> Option<NodeId> {
        if post_id == 0 {
            return None;
        }
        let hidden = self.comment_visibility(post_id).is_hidden();
        let selector = Selector::tag("section").with_data("post-id", post_id.to_string());
        let section = self
            .document
            .query_selector(self.document.root(), &selector)?;
        self.document.set_class(section, "hide", hidden).ok()?;
        Some(section)
    }

    /// Sets the post's button label from its state.
    pub fn sync_comment_button(&mut self, post_id: u64) -> Option<NodeId> {
        if post_id == 0 {
            return None;
        }
        let label = self.comment_visibility(post_id).button_label();
        let selector = Selector::tag("button").with_data("post-id", post_id.to_string());
        let button = self
            .document
            .query_selector(self.document.root(), &selector)?;
        self.document.set_text_content(button, label).ok()?;
        Some(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixture::FixturePostSource;
    use crate::domain::model::Comment;
    use async_trait::async_trait;

    const FIXTURE: &str = r#"{
        "users": [
            {"id": 1, "name": "Bret", "company": {"name": "Acme", "catchPhrase": "Ship it"}},
            {"id": 2, "name": "Julia", "company": {"name": "Globex", "catchPhrase": "Think big"}},
            {"id": 3, "name": "Quiet", "company": {"name": "Initech", "catchPhrase": "Meh"}}
        ],
        "posts": [
            {"id": 1, "userId": 1, "title": "hello", "body": "first post"},
            {"id": 2, "userId": 2, "title": "julia one", "body": "body one"},
            {"id": 3, "userId": 2, "title": "julia two", "body": "body two"}
        ],
        "comments": [
            {"postId": 1, "name": "fan", "email": "fan@example.com", "body": "great"}
        ]
    }"#;

    fn controller() -> PageController<FixturePostSource> {
        PageController::new(FixturePostSource::from_json_str(FIXTURE).unwrap())
    }

    fn main_of<S: PostSource>(page: &PageController<S>) -> NodeId {
        page.main_region().unwrap()
    }

    struct BrokenPosts;

    #[async_trait]
    impl PostSource for BrokenPosts {
        async fn users(&self) -> Result<Vec<User>> {
            Err(ViewerError::Status {
                url: "http://test/users".to_string(),
                status: 502,
            })
        }

        async fn user_posts(&self, _user_id: u64) -> Result<Vec<Post>> {
            Err(ViewerError::Status {
                url: "http://test/posts".to_string(),
                status: 500,
            })
        }

        async fn user(&self, _user_id: u64) -> Result<User> {
            Err(ViewerError::NotFound {
                resource: "users".to_string(),
            })
        }

        async fn post_comments(&self, _post_id: u64) -> Result<Vec<Comment>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_resolve_user_id() {
        assert_eq!(resolve_user_id(Some("Employees")), 1);
        assert_eq!(resolve_user_id(Some("1")), 1);
        assert_eq!(resolve_user_id(Some("7")), 7);
        assert_eq!(resolve_user_id(Some("")), 1);
        assert_eq!(resolve_user_id(None), 1);
        assert_eq!(resolve_user_id(Some("0")), 1);
        assert_eq!(resolve_user_id(Some("abc")), 1);
    }

    #[tokio::test]
    async fn test_init_app_populates_select_and_binds_change() {
        let mut page = controller();

        let outcome = page.init_app().await;

        let select = page.document().element_by_id(SELECT_MENU_ID).unwrap();
        assert!(matches!(outcome, InitOutcome::Populated { users: 3, select: s } if s == select));
        let options = page
            .document()
            .query_selector_all(select, &Selector::tag("option"));
        assert_eq!(options.len(), 4);
        assert_eq!(page.document().option_value(options[1]), "1");
        assert_eq!(page.document().text_content(options[2]), "Julia");
        assert_eq!(
            page.document().listeners(select, EventKind::Change),
            vec![Handler::SelectMenuChange]
        );
        assert!(page.document().children(main_of(&page)).is_empty());
    }

    #[tokio::test]
    async fn test_init_page_reports_fetch_failure() {
        let mut page = PageController::new(BrokenPosts);
        assert!(matches!(
            page.init_page().await,
            InitOutcome::FetchFailed(ViewerError::Status { status: 502, .. })
        ));
    }

    #[test]
    fn test_populate_select_menu_lookup_misses() {
        let mut page = controller();
        assert!(page.populate_select_menu(None).is_none());

        let mut bare = PageController::with_document(
            FixturePostSource::from_json_str(FIXTURE).unwrap(),
            Document::new(),
        );
        assert!(bare.populate_select_menu(Some(&[])).is_none());
    }

    #[tokio::test]
    async fn test_choose_user_mounts_posts_and_buttons() {
        let mut page = controller();
        page.init_app().await;

        let outcomes = page.choose_user("2").await.unwrap();

        assert_eq!(outcomes.len(), 1);
        match &outcomes[0] {
            DispatchOutcome::Selection(SelectionOutcome::Refreshed {
                user_id,
                post_count,
                summary,
            }) => {
                assert_eq!(*user_id, 2);
                assert_eq!(*post_count, 2);
                assert_eq!(summary.mounted.len(), 2);
                assert_eq!(summary.buttons.len(), 2);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let doc = page.document();
        let select = doc.element_by_id(SELECT_MENU_ID).unwrap();
        assert!(!doc.is_disabled(select));
        let articles = doc.children(main_of(&page)).to_vec();
        assert_eq!(doc.text_content(doc.children(articles[0])[0]), "julia one");
        // select change listener plus one per button
        assert_eq!(doc.listener_count(), 3);
    }

    #[tokio::test]
    async fn test_employees_prompt_equals_first_user() {
        let mut by_prompt = controller();
        by_prompt.init_app().await;
        let select = by_prompt.document().element_by_id(SELECT_MENU_ID).unwrap();
        by_prompt.dispatch(Event::change(select)).await.unwrap();

        let mut by_id = controller();
        by_id.init_app().await;
        by_id.choose_user("1").await.unwrap();

        let main_html = |page: &PageController<FixturePostSource>| {
            page.document().outer_html(page.main_region().unwrap())
        };
        assert_eq!(main_html(&by_prompt), main_html(&by_id));
        assert!(main_html(&by_id).contains("hello"));
    }

    #[tokio::test]
    async fn test_refresh_replaces_content_and_listeners() {
        let mut page = controller();
        page.init_app().await;
        page.choose_user("2").await.unwrap();
        page.click_comments_button(2).await.unwrap();
        assert_eq!(page.comment_visibility(2), CommentVisibility::Shown);

        page.choose_user("1").await.unwrap();

        let doc = page.document();
        let main = main_of(&page);
        assert_eq!(doc.children(main).len(), 1);
        assert_eq!(doc.listener_count(), 2);
        assert!(!doc.outer_html(main).contains("julia"));
        assert_eq!(page.comment_visibility(2), CommentVisibility::Hidden);
    }

    #[tokio::test]
    async fn test_user_without_posts_shows_default_text() {
        let mut page = controller();
        page.init_app().await;

        page.choose_user("3").await.unwrap();

        let doc = page.document();
        let children = doc.children(main_of(&page)).to_vec();
        assert_eq!(children.len(), 1);
        assert!(doc.has_class(children[0], "default-text"));
        assert_eq!(doc.text_content(children[0]), DEFAULT_TEXT);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_label_and_visibility() {
        let mut page = controller();
        page.init_app().await;
        page.choose_user("1").await.unwrap();

        let first = page.toggle_comments(1).unwrap();
        let section = first.section.unwrap();
        let button = first.button.unwrap();
        assert_eq!(first.visibility, CommentVisibility::Shown);
        assert!(!page.document().has_class(section, "hide"));
        assert_eq!(page.document().text_content(button), "Hide Comments");

        let second = page.toggle_comments(1).unwrap();
        assert_eq!(second.visibility, CommentVisibility::Hidden);
        assert!(page.document().has_class(section, "hide"));
        assert_eq!(page.document().text_content(button), "Show Comments");
    }

    #[tokio::test]
    async fn test_toggle_lookup_misses() {
        let mut page = controller();
        assert!(page.toggle_comments(0).is_none());

        let toggle = page.toggle_comments(42).unwrap();
        assert!(toggle.section.is_none());
        assert!(toggle.button.is_none());

        assert!(page.click_comments_button(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_post_fetch_keeps_page_and_reenables_select() {
        let mut page = PageController::new(BrokenPosts);
        page.init_app().await;
        let main = main_of(&page);
        let marker = make_text_element(page.document_mut(), "p", "previous", None);
        page.document_mut().append(main, marker).unwrap();

        let select = page.document().element_by_id(SELECT_MENU_ID).unwrap();
        let outcomes = page.dispatch(Event::change(select)).await.unwrap();

        assert!(matches!(
            outcomes.as_slice(),
            [DispatchOutcome::Selection(SelectionOutcome::FetchFailed { user_id: 1, .. })]
        ));
        assert_eq!(page.document().children(main), &[marker]);
        assert!(!page.document().is_disabled(select));
    }

    #[tokio::test]
    async fn test_click_event_does_not_trigger_selection() {
        let mut page = controller();
        page.init_app().await;
        let select = page.document().element_by_id(SELECT_MENU_ID).unwrap();

        assert!(page
            .select_menu_change(&Event::click(select))
            .await
            .unwrap()
            .is_none());
        assert!(page.dispatch(Event::click(select)).await.unwrap().is_empty());
    }

    #[test]
    fn test_delete_child_elements() {
        let mut page = controller();
        let main = main_of(&page);
        let p = make_text_element(page.document_mut(), "p", "x", None);
        page.document_mut().append(main, p).unwrap();

        assert_eq!(page.delete_child_elements(main), Some(main));
        assert!(page.document().children(main).is_empty());

        let text = page.document_mut().create_text("t");
        assert_eq!(page.delete_child_elements(text), None);
    }
}
