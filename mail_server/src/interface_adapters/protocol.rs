use askama::Template;
use serde::Deserialize;

use crate::domain::entities::MailRequest;

// Form payload posted by the mail page. Missing fields read as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MailForm {
    #[serde(rename = "serverID")]
    pub server_id: String,
    #[serde(rename = "dbName")]
    pub db_name: String,
    pub goods: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "accNames")]
    pub acc_names: String,
}

impl From<MailForm> for MailRequest {
    fn from(form: MailForm) -> Self {
        MailRequest {
            server_id: form.server_id,
            db_name: form.db_name,
            goods: form.goods,
            title: form.title,
            content: form.content,
            acc_names: form.acc_names,
        }
    }
}

// The single dashboard page, optionally showing the last dispatch outcome.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub outcome: Option<String>,
}
