/// Selectors probed when the caller does not supply its own list. Drawn
/// from the defaults of major mail and ESP providers.
pub const DEFAULT_SELECTORS: &[&str] = &[
    "default",
    "google",
    "selector1",
    "selector2",
    "k1",
    "k2",
    "k3",
    "s1",
    "s2",
    "dkim",
    "mail",
    "email",
    "smtp",
    "key1",
    "key2",
    "mandrill",
    "mailjet",
    "sendgrid",
    "amazonses",
    "zendesk1",
    "pm",
    "mailgun",
    "cm",
    "fm1",
    "protonmail",
];
