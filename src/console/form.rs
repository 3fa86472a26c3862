//! In-memory editing of one collection.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Body, ConsoleError, ContentClient, MultipartBody, StagedFile, Transport};
use crate::models::Entity;

/// A row in an editing form: persisted when `id` is set, a draft otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<E> {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub body: E,
    /// Files picked for this row but not uploaded yet
    #[serde(skip)]
    pub staged: Vec<StagedFile>,
}

impl<E: Entity> Entry<E> {
    pub fn draft(body: E) -> Self {
        Self {
            id: None,
            body,
            staged: Vec::new(),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// JSON when nothing is staged, otherwise form data carrying the files.
    ///
    /// Form data only has room for flat text, so list fields and the
    /// attachment slots themselves are left for the server to keep.
    pub fn request_body(&self) -> Result<Body, ConsoleError> {
        let value = serde_json::to_value(&self.body)?;
        if self.staged.is_empty() {
            return Ok(Body::Json(value));
        }

        let Value::Object(map) = value else {
            return Err(ConsoleError::Decode(format!(
                "{} is not a record",
                E::LABEL
            )));
        };

        let mut body = MultipartBody::default();
        for (key, field) in map {
            if E::attachment(&key).is_some() {
                continue;
            }
            let text = match field {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => continue,
            };
            body.fields.push((key, text));
        }
        body.files = self.staged.clone();

        Ok(Body::Multipart(body))
    }
}

/// Outcome of pushing a form back to the server.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitReport {
    pub created: usize,
    pub updated: usize,
    /// Row index and error message of every row that failed
    pub failed: Vec<(usize, String)>,
}

impl SubmitReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Replace the entry with the same id, or append when there is none.
pub fn reconcile<E>(entries: &mut Vec<Entry<E>>, saved: Entry<E>) {
    let existing = entries
        .iter()
        .position(|entry| entry.id.is_some() && entry.id == saved.id);
    match existing {
        Some(index) => entries[index] = saved,
        None => entries.push(saved),
    }
}

/// Editable list of one collection plus the last error shown to the user.
#[derive(Debug, Clone)]
pub struct CrudForm<E> {
    entries: Vec<Entry<E>>,
    error: Option<String>,
}

impl<E: Entity> Default for CrudForm<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            error: None,
        }
    }
}

impl<E: Entity> CrudForm<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Entry<E>>) -> Self {
        Self {
            entries,
            error: None,
        }
    }

    pub fn entries(&self) -> &[Entry<E>] {
        &self.entries
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replace the rows with the server's current list.
    pub async fn load<T: Transport>(&mut self, client: &ContentClient<T>) -> Result<(), ConsoleError> {
        match client.list::<E>().await {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Append an empty draft row and return its index.
    pub fn add(&mut self) -> usize {
        self.entries.push(Entry::draft(E::default()));
        self.entries.len() - 1
    }

    /// Edit the body of the row at `index`.
    pub fn change<F>(&mut self, index: usize, edit: F) -> Result<(), ConsoleError>
    where
        F: FnOnce(&mut E),
    {
        let entry = self.entry_mut(index)?;
        edit(&mut entry.body);
        Ok(())
    }

    /// Stage a file for the row at `index`, replacing one already staged
    /// for a single-file slot.
    pub fn attach(&mut self, index: usize, file: StagedFile) -> Result<(), ConsoleError> {
        let Some(slot) = E::attachment(&file.field) else {
            return Err(self.fail(ConsoleError::UnknownAttachment(file.field)));
        };
        let entry = self.entry_mut(index)?;
        if !slot.multiple {
            entry.staged.retain(|staged| staged.field != file.field);
        }
        entry.staged.push(file);
        Ok(())
    }

    /// Remove the row at `index`.
    ///
    /// Drafts go without a request. Persisted rows are deleted on the
    /// server first and stay in the list if that fails.
    pub async fn remove<T: Transport>(
        &mut self,
        index: usize,
        client: &ContentClient<T>,
    ) -> Result<(), ConsoleError> {
        let id = self.entry_mut(index)?.id.clone();

        if let Some(id) = id {
            if let Err(e) = client.delete::<E>(&id).await {
                return Err(self.fail(e));
            }
        }

        self.entries.remove(index);
        Ok(())
    }

    /// Save every row: PUT for persisted rows, POST for drafts.
    ///
    /// A failing row does not stop the others.
    pub async fn submit<T: Transport>(&mut self, client: &ContentClient<T>) -> SubmitReport {
        let mut report = SubmitReport::default();
        self.error = None;

        for index in 0..self.entries.len() {
            let entry = self.entries[index].clone();
            let result = match &entry.id {
                Some(id) => client.update(id, &entry).await,
                None => client.create(&entry).await,
            };

            match result {
                Ok(saved) if entry.is_draft() => {
                    self.entries[index] = saved;
                    report.created += 1;
                }
                Ok(saved) => {
                    reconcile(&mut self.entries, saved);
                    report.updated += 1;
                }
                Err(e) => {
                    tracing::warn!(collection = E::COLLECTION, index, "save failed: {}", e);
                    report.failed.push((index, e.to_string()));
                    self.error = Some(e.to_string());
                }
            }
        }

        report
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut Entry<E>, ConsoleError> {
        let len = self.entries.len();
        if index >= len {
            self.error = Some(ConsoleError::InvalidIndex { index, len }.to_string());
            return Err(ConsoleError::InvalidIndex { index, len });
        }
        Ok(&mut self.entries[index])
    }

    fn fail(&mut self, err: ConsoleError) -> ConsoleError {
        self.error = Some(err.to_string());
        err
    }
}
