use crate::core::elements::make_text_element;
use crate::domain::model::{Comment, Post, User};
use crate::domain::ports::PostSource;
use crate::dom::{Document, NodeId};
use crate::utils::error::Result;
use futures::future::join_all;

/// A post together with everything fetched to render it.
#[derive(Debug)]
pub struct PostDetails {
    pub post: Post,
    pub author: Result<User>,
    pub comments: Result<Vec<Comment>>,
}

/// `article > h3 + p + p` per comment, gathered into one fragment.
pub fn build_comments_fragment(doc: &mut Document, comments: Option<&[Comment]>) -> Option<NodeId> {
    let comments = comments?;
    let fragment = doc.create_fragment();

    for comment in comments {
        let article = doc.create_element("article");
        let heading = make_text_element(doc, "h3", &comment.name, None);
        let body = make_text_element(doc, "p", &comment.body, None);
        let from = make_text_element(doc, "p", &format!("From: {}", comment.email), None);

        // fresh nodes into fresh parents
        let _ = doc.append_all(article, &[heading, body, from]);
        let _ = doc.append(fragment, article);
    }

    Some(fragment)
}

/// `section.comments.hide[data-post-id]` holding the post's comments.
pub fn build_comments_section(
    doc: &mut Document,
    post_id: u64,
    comments: Option<&[Comment]>,
) -> Result<NodeId> {
    let section = doc.create_element("section");
    doc.set_data(section, "post-id", &post_id.to_string())?;
    doc.add_class(section, "comments")?;
    doc.add_class(section, "hide")?;

    if let Some(fragment) = build_comments_fragment(doc, comments) {
        doc.append(section, fragment)?;
    }
    Ok(section)
}

/// Fetches every post's author and comments concurrently. The result is in
/// post order regardless of completion order.
pub async fn fetch_post_details<S>(source: &S, posts: &[Post]) -> Vec<PostDetails>
where
    S: PostSource + ?Sized,
{
    let lookups = posts.iter().map(move |post| async move {
        let (author, comments) =
            futures::join!(source.user(post.user_id), source.post_comments(post.id));
        PostDetails {
            post: post.clone(),
            author,
            comments,
        }
    });
    join_all(lookups).await
}

fn build_post_article(doc: &mut Document, details: &PostDetails) -> Result<NodeId> {
    let post = &details.post;
    let article = doc.create_element("article");

    let title = make_text_element(doc, "h2", &post.title, None);
    let body = make_text_element(doc, "p", &post.body, None);
    let post_id = make_text_element(doc, "p", &format!("Post ID: {}", post.id), None);
    doc.append_all(article, &[title, body, post_id])?;

    match &details.author {
        Ok(author) => {
            let byline = make_text_element(
                doc,
                "p",
                &format!("Author: {} with {}", author.name, author.company.name),
                None,
            );
            let catch_phrase = make_text_element(doc, "p", &author.company.catch_phrase, None);
            doc.append_all(article, &[byline, catch_phrase])?;
        }
        Err(e) => {
            tracing::warn!("Author {} of post {} unavailable: {}", post.user_id, post.id, e);
            let byline = make_text_element(doc, "p", "Author: unavailable", None);
            doc.append(article, byline)?;
        }
    }

    let button = make_text_element(doc, "button", "Show Comments", None);
    doc.set_data(button, "post-id", &post.id.to_string())?;
    doc.append(article, button)?;

    let comments = match &details.comments {
        Ok(comments) => Some(comments.as_slice()),
        Err(e) => {
            tracing::warn!("Comments for post {} unavailable: {}", post.id, e);
            None
        }
    };
    let section = build_comments_section(doc, post.id, comments)?;
    doc.append(article, section)?;

    Ok(article)
}

/// Builds one article per post, in the order given, into a fragment.
pub fn assemble_posts_fragment(doc: &mut Document, details: &[PostDetails]) -> Result<NodeId> {
    let fragment = doc.create_fragment();
    for entry in details {
        let article = build_post_article(doc, entry)?;
        doc.append(fragment, article)?;
    }
    Ok(fragment)
}

pub async fn build_posts_fragment<S>(
    doc: &mut Document,
    source: &S,
    posts: &[Post],
) -> Result<NodeId>
where
    S: PostSource + ?Sized,
{
    let details = fetch_post_details(source, posts).await;
    tracing::debug!("Fetched details for {} posts", details.len());
    assemble_posts_fragment(doc, &details)
}
