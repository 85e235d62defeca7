/// The fixed message a new subscriber receives.
pub struct WelcomeEmail {
    pub subject: &'static str,
    pub html_content: &'static str,
    pub text_content: &'static str,
}

const SUBJECT: &str = "✓ Welcome to Entropy AI Lab Newsletter!";

impl WelcomeEmail {
    pub fn new() -> Self {
        Self {
            subject: SUBJECT,
            html_content: include_str!("../../templates/welcome.html"),
            text_content: include_str!("../../templates/welcome.txt").trim(),
        }
    }
}

impl Default for WelcomeEmail {
    fn default() -> Self {
        Self::new()
    }
}
