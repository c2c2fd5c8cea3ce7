//! Plain-text rendering of snapshots and reader views.

use std::io::{Result as IoResult, Write};

use chrono::{DateTime, Utc};
use ld_core::Profile;
use ld_session::{AuthPhase, AuthSnapshot};
use ld_social::{CommentView, ConversationView, MessageView, PostView, ProfessionalView};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const UNKNOWN_AUTHOR: &str = "Unknown member";

fn stamp(at: &DateTime<Utc>) -> String {
    at.format(TIME_FORMAT).to_string()
}

fn name_of(profile: Option<&Profile>) -> &str {
    profile.map(Profile::display_name).unwrap_or(UNKNOWN_AUTHOR)
}

pub fn snapshot(out: &mut dyn Write, snapshot: &AuthSnapshot) -> IoResult<()> {
    if snapshot.phase != AuthPhase::Authenticated {
        return writeln!(out, "Not signed in");
    }

    let email = snapshot
        .identity
        .as_ref()
        .and_then(|identity| identity.email.as_deref())
        .unwrap_or("-");

    match snapshot.profile {
        Some(ref profile) => {
            writeln!(out, "Signed in as {} <{}>", profile.display_name(), email)?;
            writeln!(out, "  id:       {}", profile.id)?;
            if !profile.district.is_empty() {
                writeln!(out, "  district: {}", profile.district)?;
            }
            if let Some(ref phone) = profile.phone {
                writeln!(out, "  phone:    {}", phone)?;
            }
            if !profile.is_complete() {
                writeln!(out, "  (profile incomplete)")?;
            }
            Ok(())
        }
        None => writeln!(out, "Signed in as {} (profile unavailable)", email),
    }
}

pub fn posts(out: &mut dyn Write, posts: &[PostView]) -> IoResult<()> {
    if posts.is_empty() {
        return writeln!(out, "No posts yet");
    }

    for view in posts {
        writeln!(
            out,
            "[{}] {} - {}",
            view.post.id,
            name_of(view.author.as_ref()),
            stamp(&view.post.created_at)
        )?;
        writeln!(out, "  {}", view.post.content)?;
        if let Some(ref image_url) = view.post.image_url {
            writeln!(out, "  image: {}", image_url)?;
        }
        writeln!(
            out,
            "  likes: {}{}, comments: {}",
            view.likes_count,
            if view.is_liked { " (you)" } else { "" },
            view.comments_count
        )?;
    }
    Ok(())
}

pub fn comments(out: &mut dyn Write, comments: &[CommentView]) -> IoResult<()> {
    if comments.is_empty() {
        return writeln!(out, "No comments yet");
    }

    for view in comments {
        writeln!(
            out,
            "{} - {}: {}",
            stamp(&view.comment.created_at),
            name_of(view.author.as_ref()),
            view.comment.content
        )?;
    }
    Ok(())
}

pub fn conversations(
    out: &mut dyn Write,
    conversations: &[ConversationView],
    user_id: &str,
) -> IoResult<()> {
    if conversations.is_empty() {
        return writeln!(out, "No conversations yet");
    }

    for view in conversations {
        let others: Vec<&str> = view.others(user_id).map(Profile::display_name).collect();
        let with = if others.is_empty() {
            String::from("(just you)")
        } else {
            others.join(", ")
        };
        writeln!(out, "[{}] {}", view.conversation.id, with)?;

        match view.last_message {
            Some(ref message) => writeln!(
                out,
                "  {} - {}",
                stamp(&message.created_at),
                message.content
            )?,
            None => writeln!(out, "  (no messages)")?,
        }
    }
    Ok(())
}

pub fn messages(out: &mut dyn Write, messages: &[MessageView]) -> IoResult<()> {
    if messages.is_empty() {
        return writeln!(out, "No messages yet");
    }

    for view in messages {
        writeln!(
            out,
            "{} - {}: {}",
            stamp(&view.message.created_at),
            name_of(view.sender.as_ref()),
            view.message.content
        )?;
    }
    Ok(())
}

pub fn professionals(out: &mut dyn Write, professionals: &[ProfessionalView]) -> IoResult<()> {
    if professionals.is_empty() {
        return writeln!(out, "No professionals found");
    }

    for view in professionals {
        writeln!(out, "{} - {}", view.display_name(), view.professional.specialty)?;
        if let Some(ref structure) = view.professional.structure {
            writeln!(out, "  {}", structure)?;
        }
        if let Some(ref profile) = view.profile {
            if !profile.district.is_empty() {
                writeln!(out, "  {}", profile.district)?;
            }
            if let Some(ref phone) = profile.phone {
                writeln!(out, "  {}", phone)?;
            }
        }
    }
    Ok(())
}
