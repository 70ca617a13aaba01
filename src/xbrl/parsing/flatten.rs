use indexmap::IndexMap;

use super::document::{Document, Node};

/// One row's worth of data taken from one document node. Keys keep the order
/// in which the node's children appear; a child without text maps to `None`.
pub type Record = IndexMap<String, Option<String>>;

/// Converts every node called `element` into a record, in document order.
/// A document without such nodes yields no records.
pub fn flatten(document: &Document, element: &str) -> Vec<Record> {
    let records: Vec<Record> = document
        .root
        .find_all(element)
        .into_iter()
        .map(node_to_record)
        .collect();

    log::debug!("Flattened {} <{}> element(s)", records.len(), element);
    records
}

pub fn node_to_record(node: &Node) -> Record {
    let mut record = Record::new();
    for child in &node.children {
        insert_child(&mut record, None, child);
    }
    record
}

// Nested children become dotted keys: <label><terse/></label> -> "label.terse"
fn insert_child(record: &mut Record, prefix: Option<&str>, node: &Node) {
    let key = match prefix {
        Some(prefix) => format!("{}.{}", prefix, node.name),
        None => node.name.clone(),
    };

    if !node.children.is_empty() {
        for child in &node.children {
            insert_child(record, Some(&key), child);
        }
        return;
    }

    if record.contains_key(&key) {
        log::debug!("Ignoring repeated child <{}>", key);
        return;
    }
    record.insert(key, node.text.clone());
}
