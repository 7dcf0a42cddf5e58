//! Persona context: biography documents and the system prompt built from them
//!
//! Documents are read once at startup from the persona directory:
//! - `summary.txt` (required)
//! - `linkedin.txt` (optional, profile export as plain text)
//! - `resume.txt` (optional)
//!
//! PDF extraction happens outside this process. A lone `linkedin.pdf` is
//! reported so the operator knows to provide `linkedin.txt`.

use std::fmt::Write;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SUMMARY_FILE: &str = "summary.txt";
const PROFILE_FILE: &str = "linkedin.txt";
const PROFILE_PDF: &str = "linkedin.pdf";
const RESUME_FILE: &str = "resume.txt";

/// Conduct guidance shared by every persona
const CONDUCT: &str = r"## How to engage
- Greet visitors warmly at the start of a conversation, then answer naturally.
- Stay professional, confident and approachable. Keep answers concise but substantive, and prefer concrete achievements and project outcomes over generic claims.
- Match the visitor's tone: formal, conversational or technical.
- Base every answer on the reference material below. Do not invent facts.

## Using your tools
- If a visitor shares contact details or wants to stay in touch, ask for their email and call record_user_details.
- If you cannot answer a question from the reference material, call record_unknown_question, then tell the visitor politely that you will follow up.
- If a visitor mentions a specific role or opportunity, call record_job_interest.
- When a discussion points to a collaboration or next step, call record_conversation_log with a short summary.";

#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("persona name must not be empty")]
    EmptyName,
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path} is empty")]
    EmptyDocument { path: PathBuf },
}

/// Immutable biography bundle, shared read-only across turns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    pub name: String,
    pub summary: String,
    pub profile: Option<String>,
    pub resume: Option<String>,
}

impl Persona {
    /// Load the persona documents from `dir`
    pub fn load(dir: &Path, name: &str) -> Result<Self, PersonaError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PersonaError::EmptyName);
        }

        let summary_path = dir.join(SUMMARY_FILE);
        let summary = read_optional(&summary_path)?.ok_or_else(|| PersonaError::Read {
            path: summary_path.clone(),
            source: io::Error::from(io::ErrorKind::NotFound),
        })?;
        if summary.trim().is_empty() {
            return Err(PersonaError::EmptyDocument { path: summary_path });
        }

        let profile = read_optional(&dir.join(PROFILE_FILE))?;
        if profile.is_none() && dir.join(PROFILE_PDF).exists() {
            tracing::warn!(
                dir = %dir.display(),
                "Found {PROFILE_PDF} without {PROFILE_FILE}; extract its text to {PROFILE_FILE} to include it"
            );
        }
        let resume = read_optional(&dir.join(RESUME_FILE))?;

        tracing::info!(
            name,
            has_profile = profile.is_some(),
            has_resume = resume.is_some(),
            "Persona loaded"
        );

        Ok(Self {
            name: name.to_string(),
            summary,
            profile,
            resume,
        })
    }

    /// First assistant line shown in the chat widget
    pub fn greeting(&self) -> String {
        format!("Hi there! I'm {}'s AI agent. How can I help you today?", self.name)
    }

    /// Build the system instruction for every turn
    pub fn system_prompt(&self) -> String {
        let name = &self.name;
        let mut prompt = String::new();

        let _ = writeln!(
            prompt,
            "You are an AI agent acting as {name}, representing {name} on their personal website and portfolio. \
             Visitors are mostly recruiters, hiring managers and potential collaborators. \
             Answer questions about {name}'s background, experience, projects and skills as if you were {name}, \
             and always stay in character."
        );
        let _ = writeln!(
            prompt,
            "\nWhen a conversation begins, open with a greeting such as: \"{}\"",
            self.greeting()
        );
        prompt.push('\n');
        prompt.push_str(CONDUCT);

        prompt.push_str("\n\n## Reference material\n");
        push_section(&mut prompt, "Summary", &self.summary);
        if let Some(profile) = &self.profile {
            push_section(&mut prompt, "LinkedIn Profile", profile);
        }
        if let Some(resume) = &self.resume {
            push_section(&mut prompt, "Resume", resume);
        }

        let _ = write!(
            prompt,
            "\nWith this context, chat with the visitor as {name} and leave a professional, memorable impression."
        );
        prompt
    }
}

fn push_section(prompt: &mut String, title: &str, body: &str) {
    let _ = writeln!(prompt, "\n### {title}\n");
    prompt.push_str(body.trim_end());
    prompt.push('\n');
}

/// Read a document, treating a missing file as `None`
fn read_optional(path: &Path) -> Result<Option<String>, PersonaError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersonaError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
