//! Commit object
//!
//! Commits are snapshots of the repository at specific points in time.
//! They contain:
//! - A tree object ID (the snapshot)
//! - At most one parent commit ID (history is a single linear branch)
//! - Author and committer information
//! - Commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <email> <timestamp> <timezone>
//! committer <name> <email> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::CoreError;
use anyhow::Context;
use bytes::Bytes;
use std::io::{BufRead, Read};

pub const AUTHOR_NAME_VAR: &str = "GIT_AUTHOR_NAME";
pub const AUTHOR_EMAIL_VAR: &str = "GIT_AUTHOR_EMAIL";
pub const AUTHOR_DATE_VAR: &str = "GIT_AUTHOR_DATE";

/// Author or committer information
///
/// Contains name, email, and timestamp with timezone information.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    email: String,
    timestamp: chrono::DateTime<chrono::FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current local time
    pub fn new(name: String, email: String) -> Self {
        Author {
            name,
            email,
            timestamp: chrono::Local::now().fixed_offset(),
        }
    }

    pub fn new_with_timestamp(
        name: String,
        email: String,
        timestamp: chrono::DateTime<chrono::FixedOffset>,
    ) -> Self {
        Author {
            name,
            email,
            timestamp,
        }
    }

    /// Resolve the identity recorded in a new commit
    ///
    /// An explicit `Name <email>` wins; otherwise `GIT_AUTHOR_NAME` and
    /// `GIT_AUTHOR_EMAIL` are looked up through `env`. `GIT_AUTHOR_DATE`, when set
    /// and parseable, pins the timestamp in both cases.
    pub fn resolve(
        explicit: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        let (name, email) = match explicit {
            Some(identity) => Self::parse_identity(identity)?,
            None => match (env(AUTHOR_NAME_VAR), env(AUTHOR_EMAIL_VAR)) {
                (Some(name), Some(email)) if !name.trim().is_empty() => (name, email),
                _ => return Err(CoreError::MissingAuthorIdentity.into()),
            },
        };

        let timestamp = env(AUTHOR_DATE_VAR).and_then(|date_str| {
            chrono::DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Ok(Author::new_with_timestamp(name, email, ts)),
            None => Ok(Author::new(name, email)),
        }
    }

    /// Split `Name <email>` into its parts
    pub fn parse_identity(identity: &str) -> anyhow::Result<(String, String)> {
        let email_start = identity
            .find('<')
            .ok_or_else(|| anyhow::anyhow!("Invalid author {identity:?}: missing '<'"))?;
        let email_end = identity
            .rfind('>')
            .filter(|&end| end > email_start)
            .ok_or_else(|| anyhow::anyhow!("Invalid author {identity:?}: missing '>'"))?;

        let name = identity[..email_start].trim().to_string();
        let email = identity[email_start + 1..email_end].trim().to_string();

        if name.is_empty() {
            return Err(CoreError::MissingAuthorIdentity.into());
        }

        Ok((name, email))
    }

    /// "Name <email@example.com>"
    pub fn display_name(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    /// "Name <email> <unix-seconds> <+HHMM>"
    pub fn display(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }

    pub fn timestamp(&self) -> chrono::DateTime<chrono::FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&str> for Author {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        // Format: "name <email> timestamp timezone"
        let parts: Vec<&str> = value.rsplitn(3, ' ').collect();
        if parts.len() < 3 {
            return Err(anyhow::anyhow!("Invalid author format"));
        }

        let timezone = parts[0];
        let timestamp = parts[1]
            .parse::<i64>()
            .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;
        let (name, email) = Self::parse_identity(parts[2])?;

        let offset = *chrono::DateTime::parse_from_str(
            &format!("1970-01-01 00:00:00 {timezone}"),
            "%Y-%m-%d %H:%M:%S %z",
        )
        .map_err(|_| anyhow::anyhow!("Invalid timezone"))?
        .offset();
        let datetime = chrono::DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))?
            .with_timezone(&offset);

        Ok(Author {
            name,
            email,
            timestamp: datetime,
        })
    }
}

/// Commit object
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Parent commit ID (None for the first commit on the branch)
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit whose committer is the author
    pub fn new(parent: Option<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parent,
            tree_oid,
            author: author.clone(),
            committer: author,
            message,
        }
    }

    /// First line of the commit message
    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());
        lines.push(String::new());

        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Bytes::from(self.lines().join("\n")))
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;
        let mut lines = headers.lines();

        let tree_oid = lines
            .next()
            .and_then(|line| line.strip_prefix("tree "))
            .context("Invalid commit object: invalid tree line")?;
        let tree_oid = ObjectId::try_parse(tree_oid.to_string())?;

        let mut next_line = lines
            .next()
            .context("Invalid commit object: missing author line")?;

        let parent = match next_line.strip_prefix("parent ") {
            Some(parent_oid) => {
                next_line = lines
                    .next()
                    .context("Invalid commit object: missing author line")?;
                Some(ObjectId::try_parse(parent_oid.to_string())?)
            }
            None => None,
        };

        let author = next_line
            .strip_prefix("author ")
            .context("Invalid commit object: invalid author line")?;
        let author = Author::try_from(author)?;

        let committer = lines
            .next()
            .and_then(|line| line.strip_prefix("committer "))
            .context("Invalid commit object: invalid committer line")?;
        let committer = Author::try_from(committer)?;

        Ok(Commit {
            parent,
            tree_oid,
            author,
            committer,
            message: message.strip_suffix('\n').unwrap_or(message).to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.lines().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::kind_of;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;
    use std::io::Cursor;

    fn env_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();

        move |key| vars.get(key).cloned()
    }

    #[fixture]
    fn author() -> Author {
        let timestamp = chrono::DateTime::parse_from_str(
            "2024-03-01 12:00:00 -0230",
            "%Y-%m-%d %H:%M:%S %z",
        )
        .unwrap();

        Author::new_with_timestamp("A".to_string(), "a@x.com".to_string(), timestamp)
    }

    #[fixture]
    fn tree_oid() -> ObjectId {
        ObjectId::try_parse("65829399355e5929e44741d637d52c614ac21bc3".to_string()).unwrap()
    }

    #[rstest]
    fn root_commit_has_no_parent_line(author: Author, tree_oid: ObjectId) {
        let commit = Commit::new(None, tree_oid, author, "first".to_string());

        let text = String::from_utf8(commit.serialize().unwrap().to_vec()).unwrap();
        assert_eq!(
            text,
            "tree 65829399355e5929e44741d637d52c614ac21bc3\n\
             author A <a@x.com> 1709303400 -0230\n\
             committer A <a@x.com> 1709303400 -0230\n\
             \n\
             first\n"
        );
    }

    #[rstest]
    fn child_commit_names_its_parent(author: Author, tree_oid: ObjectId) {
        let parent = ObjectId::digest(b"commit 0\0");
        let commit = Commit::new(Some(parent.clone()), tree_oid, author, "second".to_string());

        let text = String::from_utf8(commit.serialize().unwrap().to_vec()).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines[1], format!("parent {parent}"));
        assert!(lines[2].starts_with("author "));
    }

    #[rstest]
    fn parsed_commit_equals_written_commit(author: Author, tree_oid: ObjectId) {
        let parent = ObjectId::digest(b"commit 0\0");
        let commit = Commit::new(Some(parent), tree_oid, author, "line one\n\nline three".to_string());

        let parsed = Commit::deserialize(Cursor::new(commit.serialize().unwrap())).unwrap();
        assert_eq!(parsed, commit);
        assert_eq!(parsed.short_message(), "line one");
    }

    #[test]
    fn explicit_author_wins_over_environment() {
        let env = env_from(&[(AUTHOR_NAME_VAR, "Env"), (AUTHOR_EMAIL_VAR, "env@x.com")]);

        let author = Author::resolve(Some("A <a@x.com>"), env).unwrap();
        assert_eq!(author.display_name(), "A <a@x.com>");
    }

    #[test]
    fn environment_supplies_missing_author() {
        let env = env_from(&[
            (AUTHOR_NAME_VAR, "Env User"),
            (AUTHOR_EMAIL_VAR, "env@x.com"),
            (AUTHOR_DATE_VAR, "2024-03-01 12:00:00 +0530"),
        ]);

        let author = Author::resolve(None, env).unwrap();
        assert_eq!(author.display(), "Env User <env@x.com> 1709274600 +0530");
    }

    #[rstest]
    #[case(&[])]
    #[case(&[(AUTHOR_NAME_VAR, "Only Name")])]
    #[case(&[(AUTHOR_EMAIL_VAR, "only@x.com")])]
    fn missing_identity_is_reported(#[case] vars: &[(&str, &str)]) {
        let error = Author::resolve(None, env_from(vars)).unwrap_err();

        assert_eq!(kind_of(&error), Some(&CoreError::MissingAuthorIdentity));
    }

    #[test]
    fn offset_is_rendered_as_signed_hours_and_minutes() {
        let author = Author::try_from("A <a@x.com> 1709303400 -0230").unwrap();

        assert_eq!(author.display(), "A <a@x.com> 1709303400 -0230");
        assert_eq!(author.timestamp().offset().local_minus_utc(), -(2 * 3600 + 30 * 60));
    }
}
