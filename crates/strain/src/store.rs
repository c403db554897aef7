use std::{collections::HashMap, fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    EFFECT_COLUMNS, LoadError, MEDICAL_COLUMNS, SIDE_EFFECT_COLUMNS, StrainError, StrainRecord,
    StrainType, is_null_marker, normalize_image_url, normalize_key, parse_percent,
};

/// Immutable strain table, indexed by lower-cased name.
#[derive(Debug, Default)]
pub struct StrainStore {
    records: Vec<StrainRecord>,
    index: HashMap<String, usize>,
}

impl StrainStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let store = Self::from_reader(file)?;

        tracing::info!(
            path = %path.display(),
            strains = store.len(),
            "strain dataset loaded"
        );

        Ok(store)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let columns = Columns::resolve(rdr.headers()?)?;

        let mut records = Vec::new();
        let mut first_rejected = None;
        for (i, row) in rdr.records().enumerate() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or(i as u64 + 2);

            match columns.parse(&row, line) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(err @ LoadError::InvalidValue { .. }) => {
                    tracing::warn!(err = %err, "strain row skipped");
                    first_rejected.get_or_insert(err);
                }
                Err(err) => return Err(err),
            }
        }

        // Rows are skipped one by one, but a dataset with nothing usable is broken.
        if records.is_empty() {
            if let Some(err) = first_rejected {
                return Err(err);
            }
        }

        Ok(Self::from_records(records))
    }

    /// Builds a store from already validated records. Later duplicates of a
    /// name are dropped.
    pub fn from_records(records: Vec<StrainRecord>) -> Self {
        let mut store = Self::default();

        for record in records {
            let key = record.name.to_lowercase();
            if store.index.contains_key(&key) {
                tracing::warn!(strain = %record.name, "duplicate strain name skipped");
                continue;
            }

            store.index.insert(key, store.records.len());
            store.records.push(record);
        }

        store
    }

    /// Exact, case-insensitive lookup.
    pub fn get_by_name(&self, name: &str) -> Result<&StrainRecord, StrainError> {
        self.index
            .get(&name.trim().to_lowercase())
            .map(|i| &self.records[*i])
            .ok_or_else(|| StrainError::NotFound(name.trim().to_owned()))
    }

    pub fn all(&self) -> &[StrainRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

struct Columns {
    headers: Vec<String>,
    name: usize,
    strain_type: usize,
    thc: Option<usize>,
    cbd: Option<usize>,
    terpene: Option<usize>,
    description: Option<usize>,
    image: Option<usize>,
    medical_list: Option<usize>,
    effects: Vec<usize>,
    medical: Vec<usize>,
    side_effects: Vec<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let headers = headers.iter().map(normalize_key).collect::<Vec<_>>();
        let find = |names: &[&str]| {
            names
                .iter()
                .find_map(|name| headers.iter().position(|h| h == name))
        };
        let all = |names: &[&str]| {
            names
                .iter()
                .filter_map(|name| headers.iter().position(|h| h == name))
                .collect::<Vec<_>>()
        };

        Ok(Self {
            name: find(&["name", "strain"]).ok_or(LoadError::MissingColumn("name"))?,
            strain_type: find(&["type", "strain_type"]).ok_or(LoadError::MissingColumn("type"))?,
            thc: find(&["thc_level", "thc", "thc_percent"]),
            cbd: find(&["cbd_level", "cbd", "cbd_percent"]),
            terpene: find(&["most_common_terpene", "terpene"]),
            description: find(&["description"]),
            image: find(&["img_url", "image_url", "image"]),
            medical_list: find(&["medical"]),
            effects: all(EFFECT_COLUMNS),
            medical: all(MEDICAL_COLUMNS),
            side_effects: all(SIDE_EFFECT_COLUMNS),
            headers,
        })
    }

    fn parse(&self, row: &StringRecord, line: u64) -> Result<Option<StrainRecord>, LoadError> {
        let field = |i: usize| row.get(i).unwrap_or_default();
        let optional = |i: Option<usize>| i.map(field).filter(|v| !is_null_marker(v));

        let name = field(self.name);
        if is_null_marker(name) {
            tracing::warn!(row = line, "strain row without a name skipped");
            return Ok(None);
        }

        let raw_type = field(self.strain_type);
        if is_null_marker(raw_type) {
            tracing::warn!(row = line, strain = name, "strain row without a type skipped");
            return Ok(None);
        }

        let strain_type = raw_type
            .parse::<StrainType>()
            .map_err(|_| self.invalid(line, self.strain_type, raw_type))?;

        let mut record = StrainRecord::new(name, strain_type);
        record.thc_percent = self.percent(row, line, self.thc)?;
        record.cbd_percent = self.percent(row, line, self.cbd)?;
        record.most_common_terpene = optional(self.terpene).map(str::to_owned);
        record.description = optional(self.description).unwrap_or_default().to_owned();
        record.image_url = optional(self.image).and_then(normalize_image_url);

        for &i in &self.effects {
            if let Some(score) = self.percent(row, line, Some(i))? {
                record = record.effect(&self.headers[i], score);
            }
        }

        for &i in &self.medical {
            if let Some(score) = self.percent(row, line, Some(i))? {
                record = record.medical(&self.headers[i], score);
            }
        }

        for &i in &self.side_effects {
            if let Some(score) = self.percent(row, line, Some(i))? {
                record = record.side_effect(&self.headers[i], score);
            }
        }

        if let Some(list) = optional(self.medical_list) {
            record.medical_uses.extend(
                list.split(',')
                    .filter(|tag| !tag.trim().is_empty())
                    .map(normalize_key),
            );
        }

        Ok(Some(record))
    }

    fn percent(
        &self,
        row: &StringRecord,
        line: u64,
        column: Option<usize>,
    ) -> Result<Option<f64>, LoadError> {
        let Some(i) = column else {
            return Ok(None);
        };

        let value = row.get(i).unwrap_or_default();
        parse_percent(value).map_err(|_| self.invalid(line, i, value))
    }

    fn invalid(&self, line: u64, column: usize, value: &str) -> LoadError {
        LoadError::InvalidValue {
            row: line,
            column: self.headers[column].clone(),
            value: value.to_owned(),
        }
    }
}
