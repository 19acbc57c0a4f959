use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchResult {
    pub esearchresult: ESearchData,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ESearchData {
    #[serde(default, rename = "ERROR")]
    pub error: Option<String>,
    #[serde(default)]
    pub count: Option<String>,
    #[serde(default)]
    pub idlist: Vec<String>,
    /// How PubMed interpreted and translated the search query
    #[serde(default)]
    pub querytranslation: Option<String>,
    #[serde(default)]
    pub errorlist: Option<ESearchMessages>,
    #[serde(default)]
    pub warninglist: Option<ESearchMessages>,
}

/// `errorlist` / `warninglist` objects: every field is a list of strings
///
/// Keys vary (`phrasesnotfound`, `fieldsnotfound`, `quotedphraseignored`,
/// `outputmessages`, ...), so they are kept as a map.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct ESearchMessages {
    #[serde(flatten)]
    pub entries: std::collections::BTreeMap<String, serde_json::Value>,
}

impl ESearchMessages {
    /// Flatten into `"key: value"` strings, skipping empty lists
    pub fn to_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(key, value)| {
                let values: Vec<String> = match value {
                    serde_json::Value::Array(items) => items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .filter(|s| !s.is_empty())
                        .collect(),
                    serde_json::Value::String(s) if !s.is_empty() => vec![s.clone()],
                    _ => Vec::new(),
                };
                values
                    .into_iter()
                    .map(move |v| format!("{key}: {v}"))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

// PMC ID converter response structures

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IdConvResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub records: Vec<IdConvRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IdConvRecord {
    #[serde(default, deserialize_with = "crate::pmc::deserializers::string_or_number")]
    pub pmid: Option<String>,
    #[serde(default)]
    pub pmcid: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errmsg: Option<String>,
}
