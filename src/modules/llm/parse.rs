// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

/// Subject / hook / body split of a generated email.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedCopy {
    pub subject: Option<String>,
    pub hook: Option<String>,
    pub body: String,
}

/// Sections of a generated greeting email, still plain text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GreetingText {
    pub subject: Option<String>,
    pub hook: Option<String>,
    pub greeting: String,
    pub main_body: String,
    pub closing: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Greeting,
    MainBody,
    Closing,
}

/// Returns the value after `label:` when `line` starts with it, case-insensitively.
pub fn label_value<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    let trimmed = line.trim_start();
    let head = trimmed.get(..label.len())?;
    if !head.eq_ignore_ascii_case(label) {
        return None;
    }
    trimmed[label.len()..]
        .trim_start()
        .strip_prefix(':')
        .map(str::trim)
}

/// Splits `Subject:` off the first line and removes `Hook:` / `Body:` labels.
pub fn parse_copy(text: &str) -> ParsedCopy {
    let mut lines = text.lines().peekable();
    let mut parsed = ParsedCopy::default();

    if let Some(subject) = lines.peek().and_then(|first| label_value(first, "subject")) {
        parsed.subject = Some(subject.to_string()).filter(|s| !s.is_empty());
        lines.next();
    }

    let mut body = Vec::new();
    for line in lines {
        if let Some(hook) = label_value(line, "hook") {
            parsed.hook = Some(hook.to_string()).filter(|s| !s.is_empty());
            continue;
        }
        if let Some(rest) = label_value(line, "body") {
            if !rest.is_empty() {
                body.push(rest);
            }
            continue;
        }
        body.push(line);
    }
    parsed.body = body.join("\n").trim().to_string();
    parsed
}

/// Reads `Subject:`, `Hook:`, `Greeting:`, `Main Body:` and `Closing:` sections.
/// Section bodies may continue over following lines; blank lines are dropped.
pub fn parse_greeting(text: &str) -> GreetingText {
    let mut parsed = GreetingText::default();
    let mut current: Option<Section> = None;
    let mut content: Vec<&str> = Vec::new();

    let flush = |parsed: &mut GreetingText, section: Option<Section>, content: &mut Vec<&str>| {
        if let Some(section) = section {
            let joined = content.join("\n");
            match section {
                Section::Greeting => parsed.greeting = joined,
                Section::MainBody => parsed.main_body = joined,
                Section::Closing => parsed.closing = joined,
            }
        }
        content.clear();
    };

    for line in text.lines() {
        let next = if let Some(subject) = label_value(line, "subject") {
            parsed.subject = Some(subject.to_string()).filter(|s| !s.is_empty());
            continue;
        } else if let Some(hook) = label_value(line, "hook") {
            parsed.hook = Some(hook.to_string()).filter(|s| !s.is_empty());
            continue;
        } else if let Some(rest) = label_value(line, "greeting") {
            (Section::Greeting, rest)
        } else if let Some(rest) = label_value(line, "main body") {
            (Section::MainBody, rest)
        } else if let Some(rest) = label_value(line, "closing") {
            (Section::Closing, rest)
        } else {
            if current.is_some() && !line.trim().is_empty() {
                content.push(line.trim());
            }
            continue;
        };

        flush(&mut parsed, current, &mut content);
        current = Some(next.0);
        if !next.1.is_empty() {
            content.push(next.1);
        }
    }
    flush(&mut parsed, current, &mut content);
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_matching_is_case_insensitive() {
        assert_eq!(label_value("  SUBJECT:  Hello ", "subject"), Some("Hello"));
        assert_eq!(label_value("Main Body: text", "main body"), Some("text"));
        assert_eq!(label_value("Subjects: no", "subject"), None);
        assert_eq!(label_value("Sub", "subject"), None);
    }

    #[test]
    fn copy_labels_are_removed() {
        let parsed = parse_copy("Subject: Save hours\nHook: Grading is slow\nBody: <p>First</p>\n<p>Second</p>");
        assert_eq!(parsed.subject.as_deref(), Some("Save hours"));
        assert_eq!(parsed.hook.as_deref(), Some("Grading is slow"));
        assert_eq!(parsed.body, "<p>First</p>\n<p>Second</p>");
    }

    #[test]
    fn copy_without_subject_keeps_first_line() {
        let parsed = parse_copy("<p>Only body</p>");
        assert_eq!(parsed.subject, None);
        assert_eq!(parsed.body, "<p>Only body</p>");
    }

    #[test]
    fn greeting_sections_span_lines() {
        let parsed = parse_greeting(
            "Subject: Welcome!\nHook: Glad you're here\nGreeting: Hello there.\nMain Body:\nFirst paragraph.\n\nSecond paragraph.\nClosing: See you soon.",
        );
        assert_eq!(parsed.subject.as_deref(), Some("Welcome!"));
        assert_eq!(parsed.hook.as_deref(), Some("Glad you're here"));
        assert_eq!(parsed.greeting, "Hello there.");
        assert_eq!(parsed.main_body, "First paragraph.\nSecond paragraph.");
        assert_eq!(parsed.closing, "See you soon.");
    }
}
