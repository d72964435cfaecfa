//! Placeholder substitution for notification templates.
//!
//! Literal, case-sensitive replacement. A token without a value stays in the
//! output verbatim so the gap is visible in the sent message and in the logs.

pub const CANDIDATE_NAME: &str = "[Candidate Name]";
pub const JOB_TITLE: &str = "[Job Title]";
pub const ROLE_NAME: &str = "[Role Name]";
pub const COMPANY_NAME: &str = "[Company Name]";
pub const MEETING_LINK: &str = "[Insert Meeting Link]";
pub const DATE: &str = "[Date]";
pub const SENDER_NAME: &str = "[Your Name]";
pub const SENDER_TITLE: &str = "[Your Job Title]";
pub const SENDER_DESIGNATION: &str = "[Your Designation]";

pub const TOKENS: [&str; 9] = [
    CANDIDATE_NAME,
    JOB_TITLE,
    ROLE_NAME,
    COMPANY_NAME,
    MEETING_LINK,
    DATE,
    SENDER_NAME,
    SENDER_TITLE,
    SENDER_DESIGNATION,
];

/// Used when the template store has nothing for the category.
pub const DEFAULT_QUALIFIED_TEMPLATE: &str = "Dear [Candidate Name],

Thank you for applying for the [Job Title] position at [Company Name]. We were impressed by \
your background and would like to invite you to the next stage of the process for the \
[Role Name] role.

Please use the following link to book a time that suits you: [Insert Meeting Link]

Best regards,
[Your Name]
[Your Job Title], [Company Name]
[Date]";

#[derive(Debug, Clone, Default)]
pub struct TemplateValues {
    pub candidate_name: Option<String>,
    pub job_title: Option<String>,
    pub role_name: Option<String>,
    pub company_name: Option<String>,
    pub meeting_link: Option<String>,
    pub date: Option<String>,
    pub sender_name: Option<String>,
    pub sender_title: Option<String>,
    pub sender_designation: Option<String>,
}

impl TemplateValues {
    fn pairs(&self) -> [(&'static str, Option<&str>); 9] {
        [
            (CANDIDATE_NAME, self.candidate_name.as_deref()),
            (JOB_TITLE, self.job_title.as_deref()),
            (ROLE_NAME, self.role_name.as_deref()),
            (COMPANY_NAME, self.company_name.as_deref()),
            (MEETING_LINK, self.meeting_link.as_deref()),
            (DATE, self.date.as_deref()),
            (SENDER_NAME, self.sender_name.as_deref()),
            (SENDER_TITLE, self.sender_title.as_deref()),
            (SENDER_DESIGNATION, self.sender_designation.as_deref()),
        ]
    }
}

/// Single left-to-right pass: substituted values are never scanned again, so a
/// value that itself looks like a token is emitted literally.
pub fn render(template: &str, values: &TemplateValues) -> String {
    let pairs = values.pairs();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let substituted = tail
            .find(']')
            .and_then(|close| value_for(&pairs, &tail[..=close]).map(|value| (value, close + 1)));
        match substituted {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('[');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn value_for<'a>(pairs: &[(&'static str, Option<&'a str>)], token: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(known, _)| *known == token)
        .and_then(|(_, value)| value.map(str::trim).filter(|v| !v.is_empty()))
}

/// Recognised tokens still present in `rendered`.
pub fn unreplaced_tokens(rendered: &str) -> Vec<&'static str> {
    TOKENS
        .iter()
        .copied()
        .filter(|token| rendered.contains(token))
        .collect()
}
