use std::fmt;

// Mail type written for every operator-issued mail.
pub const SYSTEM_MAIL_KIND: i32 = 1;
// Sender id reserved for the system account.
pub const SYSTEM_SENDER_ID: i64 = 0;

// Operator credential loaded from configuration.
#[derive(Clone)]
pub struct Credential {
    pub user: String,
    pub secret: String,
}

// Raw form values submitted by the operator, untouched by validation.
#[derive(Clone, Debug, Default)]
pub struct MailRequest {
    pub server_id: String,
    pub db_name: String,
    pub goods: String,
    pub title: String,
    pub content: String,
    pub acc_names: String,
}

// One attachment entry: item id and stack size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GoodsItem {
    pub item_id: u64,
    pub quantity: u64,
}

// Ordered attachment list. Display renders the storage encoding `[{id,qty},...]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoodsList(pub Vec<GoodsItem>);

impl GoodsList {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GoodsList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (index, item) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{{{},{}}}", item.item_id, item.quantity)?;
        }
        f.write_str("]")
    }
}

// Validated batch before account names are resolved to player ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedBatch {
    pub shard_id: i64,
    pub account_names: Vec<String>,
    pub goods: GoodsList,
}

// Batch whose account names all resolved; `player_ids[i]` belongs to `account_names[i]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientBatch {
    pub shard_id: i64,
    pub account_names: Vec<String>,
    pub player_ids: Vec<i64>,
}

// A single mail row as written to the shard database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MailRecord {
    pub mail_id: u64,
    pub kind: i32,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub title: String,
    pub content: String,
    pub attachment: String,
    pub created_at: i64,
}

impl MailRecord {
    pub fn system(
        mail_id: u64,
        recipient_id: i64,
        title: &str,
        content: &str,
        attachment: &str,
        created_at: i64,
    ) -> Self {
        Self {
            mail_id,
            kind: SYSTEM_MAIL_KIND,
            sender_id: SYSTEM_SENDER_ID,
            recipient_id,
            title: title.to_string(),
            content: content.to_string(),
            attachment: attachment.to_string(),
            created_at,
        }
    }
}
