//! Credential message rendering shared by both notification variants.
//!
//! The transport and capture adapters must emit byte-identical content for
//! the same notice, so the template lives here and nowhere else.

use chrono::{DateTime, Utc};

use crate::domain::ports::CredentialNotice;

/// Subject line for the credential message.
pub fn render_subject(notice: &CredentialNotice) -> String {
    format!("Your Syndica access for the {} plan", notice.plan_name)
}

/// Render the self-contained HTML document: a human-readable header block
/// (recipient, plan, timestamp) followed by the credential and onboarding
/// instructions.
pub fn render_html(notice: &CredentialNotice, sent_at: DateTime<Utc>) -> String {
    let timestamp = sent_at.to_rfc3339();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Welcome to Syndica</title>
</head>
<body>
<div class="header">
  <p>Recipient: {name} &lt;{email}&gt;</p>
  <p>Plan: {plan}</p>
  <p>Sent: {timestamp}</p>
</div>
<h1>Welcome aboard, {name}</h1>
<p>Your syndic account has been created and your <strong>{plan}</strong> subscription is active.</p>
<p>Sign in with:</p>
<ul>
  <li>Email: <strong>{email}</strong></li>
  <li>Temporary password: <strong>{credential}</strong></li>
</ul>
<p>Getting started:</p>
<ol>
  <li>Sign in and change your temporary password.</li>
  <li>Complete your residence profile.</li>
  <li>Invite your residents from the dashboard.</li>
</ol>
<p>If you did not request this account, please ignore this message.</p>
</body>
</html>
"#,
        name = notice.recipient_name,
        email = notice.recipient_email,
        plan = notice.plan_name,
        credential = notice.credential(),
    )
}

/// Deterministic artifact name for the capture variant: UTC timestamp plus
/// the recipient email with `@` replaced by a filesystem-safe token.
pub fn artifact_file_name(sent_at: DateTime<Utc>, recipient_email: &str) -> String {
    format!(
        "{}_{}.html",
        sent_at.format("%Y%m%dT%H%M%SZ"),
        recipient_email.replace('@', "_at_"),
    )
}
