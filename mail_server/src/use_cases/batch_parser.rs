use crate::domain::entities::{GoodsItem, GoodsList, ParsedBatch};
use crate::domain::errors::DispatchError;

// Separator between account names and between goods entries.
const LIST_SEPARATOR: char = '/';
// Separator between item id and quantity inside one goods entry.
const FIELD_SEPARATOR: char = ',';

pub fn parse_shard_id(text: &str) -> Result<i64, DispatchError> {
    text.parse::<i64>().map_err(|_| DispatchError::InvalidShardId)
}

pub fn parse_account_names(text: &str) -> Result<Vec<String>, DispatchError> {
    if text.is_empty() {
        return Err(DispatchError::EmptyRecipients);
    }

    let names: Vec<String> = text
        .split(LIST_SEPARATOR)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(DispatchError::EmptyRecipients);
    }
    Ok(names)
}

pub fn parse_goods(text: &str) -> Result<GoodsList, DispatchError> {
    let malformed = || DispatchError::MalformedGoods {
        goods: text.to_string(),
    };

    let mut items = Vec::new();
    for entry in text.split(LIST_SEPARATOR).filter(|entry| !entry.is_empty()) {
        let fields: Vec<&str> = entry.split(FIELD_SEPARATOR).collect();
        let [item_id, quantity] = fields.as_slice() else {
            return Err(malformed());
        };

        items.push(GoodsItem {
            item_id: item_id.parse().map_err(|_| malformed())?,
            quantity: quantity.parse().map_err(|_| malformed())?,
        });
    }

    Ok(GoodsList(items))
}

// Validate a whole batch in rule order: shard id, recipients, goods.
pub fn parse_batch(
    shard_text: &str,
    goods_text: &str,
    account_names_text: &str,
) -> Result<ParsedBatch, DispatchError> {
    let shard_id = parse_shard_id(shard_text)?;
    let account_names = parse_account_names(account_names_text)?;
    let goods = parse_goods(goods_text)?;

    Ok(ParsedBatch {
        shard_id,
        account_names,
        goods,
    })
}
