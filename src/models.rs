use crate::errors::CitizenError;
use crate::masks::{is_valid_cns, is_valid_cpf, remove_cns_mask, remove_cpf_mask};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============ Citizen Models ============

/// A citizen record as served by the backend and the mock factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citizen {
    /// Unique identifier (UUID string).
    pub id: String,
    /// CPF, possibly masked.
    pub cpf: String,
    /// CNS health card number, possibly masked.
    pub cns: String,
    pub name: String,
    /// Gender code ("M" or "F").
    pub gender: String,
    /// CPF of the legal guardian, if any.
    pub cpf_responsible: Option<String>,
    pub mother_name: String,
    /// ISO date (`YYYY-MM-DD`).
    pub birth_date: String,
    pub phone: Option<String>,
    pub cellphone: Option<String>,
    pub email: Option<String>,
    pub address: Address,
    /// Race category (white, black, brown, indigenous, yellow).
    pub race: String,
    /// Household code.
    pub co_cidadao: i64,
    pub is_dead: bool,
    #[serde(default)]
    pub pregnant: Option<bool>,
    /// RG number.
    #[serde(default)]
    pub identification_document: Option<String>,
    /// Agency that issued the RG (SSP, DETRAN, IFP).
    #[serde(default)]
    pub issuing_agency: Option<String>,
}

/// Postal address of a citizen. Every part is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub cep: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: Option<String>,
    pub uf: Option<String>,
}

/// A full or field-projected citizen as a JSON object.
pub type CitizenFields = Map<String, Value>;

/// Keys kept by field projection regardless of what the caller asked for.
pub const DEFAULT_FIELDS: [&str; 3] = ["name", "cpf", "cns"];

impl Citizen {
    /// Converts the citizen into its JSON object form.
    pub fn to_fields(&self) -> CitizenFields {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Birth date formatted as `DD/MM/YYYY`.
    pub fn birth_date_dmy(&self) -> String {
        dmy_format(&self.birth_date)
    }

    /// Applies every set override on top of this citizen.
    pub fn apply(&mut self, overrides: &CitizenOverrides) {
        let o = overrides.clone();
        if let Some(v) = o.id {
            self.id = v;
        }
        if let Some(v) = o.cpf {
            self.cpf = v;
        }
        if let Some(v) = o.cns {
            self.cns = v;
        }
        if let Some(v) = o.name {
            self.name = v;
        }
        if let Some(v) = o.gender {
            self.gender = v;
        }
        if let Some(v) = o.cpf_responsible {
            self.cpf_responsible = v;
        }
        if let Some(v) = o.mother_name {
            self.mother_name = v;
        }
        if let Some(v) = o.birth_date {
            self.birth_date = v;
        }
        if let Some(v) = o.phone {
            self.phone = v;
        }
        if let Some(v) = o.cellphone {
            self.cellphone = v;
        }
        if let Some(v) = o.email {
            self.email = v;
        }
        if let Some(v) = o.address {
            self.address = v;
        }
        if let Some(v) = o.race {
            self.race = v;
        }
        if let Some(v) = o.co_cidadao {
            self.co_cidadao = v;
        }
        if let Some(v) = o.is_dead {
            self.is_dead = v;
        }
        if let Some(v) = o.pregnant {
            self.pregnant = v;
        }
        if let Some(v) = o.identification_document {
            self.identification_document = v;
        }
        if let Some(v) = o.issuing_agency {
            self.issuing_agency = v;
        }
    }
}

/// Partial citizen applied over generated records.
///
/// For nullable fields the outer `Option` says whether to override and the
/// inner one is the new value, so `Some(None)` clears the field.
#[derive(Debug, Clone, Default)]
pub struct CitizenOverrides {
    pub id: Option<String>,
    pub cpf: Option<String>,
    pub cns: Option<String>,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub cpf_responsible: Option<Option<String>>,
    pub mother_name: Option<String>,
    pub birth_date: Option<String>,
    pub phone: Option<Option<String>>,
    pub cellphone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub address: Option<Address>,
    pub race: Option<String>,
    pub co_cidadao: Option<i64>,
    pub is_dead: Option<bool>,
    pub pregnant: Option<Option<bool>>,
    pub identification_document: Option<Option<String>>,
    pub issuing_agency: Option<Option<String>>,
}

// ============ Request Models ============

/// Parameters of a paginated citizen listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexParams {
    /// 1-based page number.
    pub page: u32,
    pub per_page: Option<u32>,
    pub search_string: Option<String>,
    /// Field projection; `name`, `cpf` and `cns` are always kept.
    pub fields: Option<Vec<String>>,
}

impl IndexParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page: Some(per_page),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search_string: impl Into<String>) -> Self {
        self.search_string = Some(search_string.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Page size used by the mock pipeline; an unset page size means 1.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.unwrap_or(1)
    }

    pub fn validate(&self) -> Result<(), CitizenError> {
        if self.page < 1 {
            return Err(CitizenError::InvalidParams("page must be >= 1".to_string()));
        }
        if self.per_page == Some(0) {
            return Err(CitizenError::InvalidParams(
                "perPage must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Query pairs sent to a real backend. Unset options are omitted and
    /// each projected field is sent as its own `fields[]` pair.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", self.page.to_string())];
        if let Some(per_page) = self.per_page {
            query.push(("perPage", per_page.to_string()));
        }
        if let Some(ref search) = self.search_string {
            query.push(("searchString", search.clone()));
        }
        if let Some(ref fields) = self.fields {
            query.extend(fields.iter().map(|f| ("fields[]", f.clone())));
        }
        query
    }
}

/// Parameters of the unpaginated search used by the select component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub search_string: String,
}

impl SearchParams {
    pub fn new(search_string: impl Into<String>) -> Self {
        Self {
            search_string: search_string.into(),
        }
    }
}

/// Payload sent when creating a citizen. Identifiers are unmasked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCitizenParams {
    pub name: String,
    pub cpf: String,
    pub cns: String,
    pub gender: String,
    pub birth_date: String,
}

/// Citizen creation form as filled in by a user, identifiers still masked.
#[derive(Debug, Clone, Default)]
pub struct CitizenForm {
    pub name: String,
    pub cpf: String,
    pub cns: String,
    pub gender: String,
    pub birth_date: String,
}

impl CitizenForm {
    /// Returns the first failing rule as `InvalidParams`.
    pub fn validate(&self) -> Result<(), CitizenError> {
        if self.name.trim().is_empty() {
            return Err(CitizenError::InvalidParams(
                "Esse campo é obrigatório".to_string(),
            ));
        }
        if !self.cpf.trim().is_empty() && !is_valid_cpf(&self.cpf) {
            return Err(CitizenError::InvalidParams("O CPF é inválido".to_string()));
        }
        if !is_valid_cns(&self.cns) {
            return Err(CitizenError::InvalidParams("O CNS é inválido".to_string()));
        }
        Ok(())
    }

    pub fn as_request_payload(&self) -> CreateCitizenParams {
        CreateCitizenParams {
            name: self.name.clone(),
            cpf: remove_cpf_mask(&self.cpf),
            cns: remove_cns_mask(&self.cns),
            gender: self.gender.clone(),
            birth_date: self.birth_date.clone(),
        }
    }
}

// ============ Response Models ============

/// Pagination metadata of a [`CitizenPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub per_page: u32,
    /// Number of records matching the search, before pagination.
    pub total: usize,
    pub last_page: usize,
}

/// One page of citizens plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitizenPage {
    pub data: Vec<CitizenFields>,
    pub meta: PageMeta,
}

/// Mock response of a citizen creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedCitizen {
    pub citizen: CreatedCitizenRecord,
}

/// Echo of the creation payload with placeholder values for the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedCitizenRecord {
    #[serde(flatten)]
    pub params: CreateCitizenParams,
    pub race: String,
    pub co_cidadao: i64,
    pub is_dead: bool,
    pub mother_name: String,
}

/// Result of a service call: the backend body as-is, or the typed mock result.
#[derive(Debug, Clone, PartialEq)]
pub enum CitizenPayload<T> {
    /// Body returned by the configured backend, untouched.
    Remote(Value),
    /// Result produced by the mock pipeline.
    Mock(T),
}

impl<T> CitizenPayload<T> {
    pub fn is_remote(&self) -> bool {
        matches!(self, CitizenPayload::Remote(_))
    }

    pub fn into_mock(self) -> Option<T> {
        match self {
            CitizenPayload::Mock(value) => Some(value),
            CitizenPayload::Remote(_) => None,
        }
    }
}

impl<T: Serialize> CitizenPayload<T> {
    /// JSON form of either variant.
    pub fn into_value(self) -> Result<Value, serde_json::Error> {
        match self {
            CitizenPayload::Remote(value) => Ok(value),
            CitizenPayload::Mock(value) => serde_json::to_value(value),
        }
    }
}

// ============ Display Helpers ============

/// Selectable gender option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenderOption {
    pub name: &'static str,
    pub value: &'static str,
}

pub fn genders() -> [GenderOption; 2] {
    [
        GenderOption {
            name: "Feminino",
            value: "F",
        },
        GenderOption {
            name: "Masculino",
            value: "M",
        },
    ]
}

/// Formats an ISO date (`YYYY-MM-DD`) as `DD/MM/YYYY`, or `"--"` when it cannot be parsed.
pub fn dmy_format(date: &str) -> String {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|_| "--".to_string())
}
