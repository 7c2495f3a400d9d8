pub mod mailgun;

pub use mailgun::MailgunMailer;

use async_trait::async_trait;

/// Outbound email delivery. Implementations must be safe to share across
/// request handlers.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> anyhow::Result<()>;
}

// Message templates. Plain inline-styled HTML so they render in every client.

pub fn otp_email(code: &str, minutes: i64) -> (String, String) {
    let subject = "Your Marmu verification code".to_string();
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 480px;\">\
           <h2>Marmu Barber &amp; Tattoo Shop</h2>\
           <p>Use this code to verify your email address:</p>\
           <p style=\"font-size: 28px; letter-spacing: 6px; font-weight: bold;\">{code}</p>\
           <p>The code expires in {minutes} minutes. If you did not request it, ignore this email.</p>\
         </div>"
    );
    (subject, html)
}

pub fn appointment_status_email(
    fullname: &str,
    service: &str,
    date: &str,
    time: &str,
    status: &str,
) -> (String, String) {
    let subject = format!("Your {service} appointment was {status}");
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 480px;\">\
           <h2>Marmu Barber &amp; Tattoo Shop</h2>\
           <p>Hi {fullname},</p>\
           <p>Your <strong>{service}</strong> appointment on <strong>{date}</strong> at \
              <strong>{time}</strong> is now <strong>{status}</strong>.</p>\
           <p>See you soon!</p>\
         </div>"
    );
    (subject, html)
}

pub fn feedback_reply_email(username: &str, message: &str, reply: &str) -> (String, String) {
    let subject = "We replied to your feedback".to_string();
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 480px;\">\
           <h2>Marmu Barber &amp; Tattoo Shop</h2>\
           <p>Hi {username},</p>\
           <p>You wrote:</p>\
           <blockquote style=\"border-left: 3px solid #ccc; padding-left: 12px; color: #555;\">{message}</blockquote>\
           <p>Our reply:</p>\
           <p>{reply}</p>\
         </div>"
    );
    (subject, html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_email_contains_code_and_expiry() {
        let (subject, html) = otp_email("482913", 5);
        assert!(subject.contains("verification"));
        assert!(html.contains("482913"));
        assert!(html.contains("5 minutes"));
    }

    #[test]
    fn test_status_email_names_the_outcome() {
        let (subject, html) =
            appointment_status_email("Alice", "Haircut", "2030-06-10", "10:00", "Approved");
        assert!(subject.contains("Approved"));
        assert!(html.contains("Alice"));
        assert!(html.contains("2030-06-10"));
        assert!(html.contains("10:00"));
    }

    #[test]
    fn test_feedback_reply_email_quotes_both_sides() {
        let (_, html) = feedback_reply_email("alice", "great cut", "thank you!");
        assert!(html.contains("great cut"));
        assert!(html.contains("thank you!"));
    }
}
