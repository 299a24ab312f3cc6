use crate::core::controller::{DispatchOutcome, InitOutcome, PageController, SelectionOutcome};
use crate::domain::ports::{ConfigProvider, PostSource};
use crate::dom::Document;
use crate::utils::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub users: usize,
    pub user_id: Option<u64>,
    pub posts: Option<usize>,
    pub expanded: Vec<u64>,
}

/// Runs the page lifecycle without a browser: load, optionally pick a user,
/// optionally open some comment sections.
pub struct ViewerEngine<S: PostSource> {
    page: PageController<S>,
}

impl<S: PostSource> ViewerEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            page: PageController::new(source),
        }
    }

    pub fn page(&self) -> &PageController<S> {
        &self.page
    }

    pub fn document(&self) -> &Document {
        self.page.document()
    }

    pub fn into_html(self) -> String {
        self.page.into_document().to_html()
    }

    pub async fn run<C: ConfigProvider>(&mut self, config: &C) -> Result<RenderReport> {
        tracing::info!("Loading users");
        let mut report = RenderReport::default();

        match self.page.init_app().await {
            InitOutcome::Populated { users, .. } => report.users = users,
            InitOutcome::SelectMissing => tracing::warn!("Users loaded but nowhere to list them"),
            InitOutcome::FetchFailed(error) => return Err(error),
        }

        let Some(user) = config.initial_user() else {
            tracing::info!("No user selected, rendering the user list only");
            return Ok(report);
        };

        for outcome in self.page.choose_user(user).await? {
            match outcome {
                DispatchOutcome::Selection(SelectionOutcome::Refreshed {
                    user_id,
                    post_count,
                    ..
                }) => {
                    tracing::info!("Rendered {} posts for user {}", post_count, user_id);
                    report.user_id = Some(user_id);
                    report.posts = Some(post_count);
                }
                DispatchOutcome::Selection(SelectionOutcome::FetchFailed { error, .. }) => {
                    return Err(error);
                }
                DispatchOutcome::Toggle(_) => {}
            }
        }

        for post_id in config.expanded_posts() {
            let outcomes = self.page.click_comments_button(*post_id).await?;
            if outcomes.is_empty() {
                tracing::warn!("Post {} is not on the page, nothing to expand", post_id);
            } else {
                report.expanded.push(*post_id);
            }
        }

        Ok(report)
    }
}
