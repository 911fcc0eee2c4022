//! Offline JSON catalog implementing the resource service contract.
//!
//! The catalog is a single JSON document mapping collection names (such as
//! `ecloud_volumes`) to arrays of entity objects. Filters, sorts and paging
//! are evaluated in memory with the same semantics the API applies, so the
//! command layer behaves identically against either backend. Creations,
//! updates and deletions are written back to the file immediately.

mod query;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::output::{Row, scalar};
use crate::params::RequestParameters;
use crate::service::{IdScheme, Resource, ResourceService, ServiceError};

pub use query::{DEFAULT_PER_PAGE, matches_filter, paginate, sort_rows};

/// Errors raised while loading or saving the catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Raised when file system operations fail.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be accessed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the file is not valid JSON.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path that could not be parsed.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
    /// Raised when the JSON does not have the catalog layout.
    #[error("invalid catalog in {path}: {message}")]
    InvalidStructure {
        /// Path that had invalid content.
        path: Utf8PathBuf,
        /// Human-readable error message.
        message: String,
    },
}

/// File-backed store of resource collections.
#[derive(Debug)]
pub struct Catalog {
    path: Utf8PathBuf,
    collections: RefCell<BTreeMap<String, Vec<Row>>>,
}

impl Catalog {
    /// Loads the catalog at `path`. A missing file yields an empty catalog
    /// that is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the file exists but cannot be read or
    /// does not contain an object of arrays of objects.
    pub fn open(location: impl Into<Utf8PathBuf>) -> Result<Self, CatalogError> {
        let path = location.into();
        let collections = if path_exists(&path)? {
            let contents = read_catalog(&path)?;
            parse_catalog(&path, &contents)?
        } else {
            BTreeMap::new()
        };
        tracing::debug!(%path, collections = collections.len(), "catalog loaded");
        Ok(Self {
            path,
            collections: RefCell::new(collections),
        })
    }

    /// Snapshot of one collection's raw rows.
    #[must_use]
    pub fn rows(&self, collection: &str) -> Vec<Row> {
        self.collections
            .borrow()
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Writes the current contents back to disk.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] when the file cannot be written.
    pub fn persist(&self) -> Result<(), CatalogError> {
        let rendered = serde_json::to_string_pretty(&*self.collections.borrow()).map_err(|err| {
            CatalogError::Parse {
                path: self.path.clone(),
                message: err.to_string(),
            }
        })?;
        write_catalog(&self.path, &rendered)
    }

    fn position<R: Resource>(&self, id: &impl Display) -> Result<usize, ServiceError> {
        let wanted = id.to_string();
        self.collections
            .borrow()
            .get(R::COLLECTION)
            .and_then(|rows| {
                rows.iter()
                    .position(|row| scalar(row.get(R::ID_FIELD)) == wanted)
            })
            .ok_or_else(|| ServiceError::not_found::<R>(&wanted))
    }

    fn mint_id<R: Resource>(&self, request: &Row) -> Result<Value, ServiceError> {
        match R::ID_SCHEME {
            IdScheme::Sequential => {
                let highest = self
                    .collections
                    .borrow()
                    .get(R::COLLECTION)
                    .into_iter()
                    .flatten()
                    .filter_map(|row| row.get(R::ID_FIELD).and_then(Value::as_u64))
                    .max()
                    .unwrap_or_default();
                Ok(Value::from(highest.saturating_add(1)))
            }
            IdScheme::Prefixed(prefix) => {
                let suffix: String = Uuid::new_v4()
                    .simple()
                    .to_string()
                    .chars()
                    .take(8)
                    .collect();
                Ok(Value::String(format!("{prefix}-{suffix}")))
            }
            IdScheme::Uuid => Ok(Value::String(Uuid::new_v4().to_string())),
            IdScheme::Provided => {
                let id = request
                    .get(R::ID_FIELD)
                    .filter(|value| !value.is_null())
                    .cloned()
                    .ok_or_else(|| {
                        ServiceError::Backend(format!("{} requires a {}", R::KIND, R::ID_FIELD))
                    })?;
                if self.position::<R>(&scalar(Some(&id))).is_ok() {
                    return Err(ServiceError::Backend(format!(
                        "{} already exists with ID [{}]",
                        R::KIND,
                        scalar(Some(&id))
                    )));
                }
                Ok(id)
            }
        }
    }

    fn save(&self) -> Result<(), ServiceError> {
        self.persist()
            .map_err(|err| ServiceError::Backend(err.to_string()))
    }
}

impl<R: Resource> ResourceService<R> for Catalog {
    fn list(&self, params: &RequestParameters) -> Result<Vec<R::Entity>, ServiceError> {
        let mut rows: Vec<Row> = self
            .rows(R::COLLECTION)
            .into_iter()
            .filter(|row| {
                params
                    .filters()
                    .iter()
                    .all(|filter| matches_filter(row, filter))
            })
            .collect();
        sort_rows(&mut rows, params.sorts());
        let page = paginate(rows, params.pagination());
        tracing::debug!(
            collection = R::COLLECTION,
            %params,
            returned = page.len(),
            "catalog list"
        );
        page.into_iter().map(decode::<R>).collect()
    }

    fn get(&self, id: &R::Id) -> Result<R::Entity, ServiceError> {
        let index = self.position::<R>(id)?;
        let row = self
            .collections
            .borrow()
            .get(R::COLLECTION)
            .and_then(|rows| rows.get(index).cloned())
            .ok_or_else(|| ServiceError::not_found::<R>(id))?;
        decode::<R>(row)
    }

    fn patch(&self, id: &R::Id, patch: &R::Patch) -> Result<(), ServiceError> {
        let Value::Object(changes) =
            serde_json::to_value(patch).map_err(|err| ServiceError::Backend(err.to_string()))?
        else {
            return Err(ServiceError::Unsupported {
                kind: R::KIND.to_owned(),
                operation: String::from("update"),
            });
        };

        let index = self.position::<R>(id)?;
        {
            let mut collections = self.collections.borrow_mut();
            let row = collections
                .get_mut(R::COLLECTION)
                .and_then(|rows| rows.get_mut(index))
                .ok_or_else(|| ServiceError::not_found::<R>(id))?;
            for (key, value) in changes {
                if !value.is_null() {
                    row.insert(key, value);
                }
            }
        }
        tracing::debug!(collection = R::COLLECTION, %id, "catalog patch");
        self.save()
    }

    fn create(&self, request: &R::Create) -> Result<R::Id, ServiceError> {
        let fields = match serde_json::to_value(request)
            .map_err(|err| ServiceError::Backend(err.to_string()))?
        {
            Value::Object(object) if !object.is_empty() => object,
            _ => {
                return Err(ServiceError::Unsupported {
                    kind: R::KIND.to_owned(),
                    operation: String::from("create"),
                });
            }
        };

        let id_value = self.mint_id::<R>(&fields)?;
        let rendered = scalar(Some(&id_value));
        let id = rendered.parse::<R::Id>().map_err(|_| {
            ServiceError::Backend(format!("allocated {} ID [{rendered}] is invalid", R::KIND))
        })?;

        let mut row = Row::new();
        row.insert(R::ID_FIELD.to_owned(), id_value);
        for (key, value) in fields {
            if key != R::ID_FIELD {
                row.insert(key, value);
            }
        }
        self.collections
            .borrow_mut()
            .entry(R::COLLECTION.to_owned())
            .or_default()
            .push(row);
        tracing::debug!(collection = R::COLLECTION, %id, "catalog create");
        self.save()?;
        Ok(id)
    }

    fn delete(&self, id: &R::Id) -> Result<(), ServiceError> {
        let index = self.position::<R>(id)?;
        {
            let mut collections = self.collections.borrow_mut();
            if let Some(rows) = collections.get_mut(R::COLLECTION)
                && index < rows.len()
            {
                rows.remove(index);
            }
        }
        tracing::debug!(collection = R::COLLECTION, %id, "catalog delete");
        self.save()
    }
}

fn decode<R: Resource>(row: Row) -> Result<R::Entity, ServiceError> {
    serde_json::from_value(Value::Object(row)).map_err(|err| {
        ServiceError::Backend(format!("malformed {} record: {err}", R::KIND))
    })
}

fn split_path(path: &Utf8Path) -> Result<(&Utf8Path, &str), CatalogError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| CatalogError::InvalidStructure {
            path: path.to_path_buf(),
            message: String::from("catalog path is missing a filename"),
        })?;
    Ok((parent, file_name))
}

fn path_exists(path: &Utf8Path) -> Result<bool, CatalogError> {
    let (parent, file_name) = split_path(path)?;
    match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(dir) => dir.try_exists(file_name).map_err(|err| CatalogError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(CatalogError::Io {
            path: parent.to_path_buf(),
            message: err.to_string(),
        }),
    }
}

fn read_catalog(path: &Utf8Path) -> Result<String, CatalogError> {
    let (parent, file_name) = split_path(path)?;
    let dir =
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| CatalogError::Io {
            path: parent.to_path_buf(),
            message: err.to_string(),
        })?;
    dir.read_to_string(file_name)
        .map_err(|err| CatalogError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

fn parse_catalog(
    path: &Utf8Path,
    contents: &str,
) -> Result<BTreeMap<String, Vec<Row>>, CatalogError> {
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let value: Value = serde_json::from_str(contents).map_err(|err| CatalogError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let Value::Object(root) = value else {
        return Err(CatalogError::InvalidStructure {
            path: path.to_path_buf(),
            message: String::from("catalog root is not an object"),
        });
    };

    let mut collections = BTreeMap::new();
    for (name, entries) in root {
        let Value::Array(items) = entries else {
            return Err(CatalogError::InvalidStructure {
                path: path.to_path_buf(),
                message: format!("collection {name} must be an array"),
            });
        };
        let rows = items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                _ => Err(CatalogError::InvalidStructure {
                    path: path.to_path_buf(),
                    message: format!("collection {name} must only contain objects"),
                }),
            })
            .collect::<Result<Vec<Row>, CatalogError>>()?;
        collections.insert(name, rows);
    }
    Ok(collections)
}

fn write_catalog(path: &Utf8Path, rendered: &str) -> Result<(), CatalogError> {
    let (parent, file_name) = split_path(path)?;
    Dir::create_ambient_dir_all(parent, ambient_authority()).map_err(|err| CatalogError::Io {
        path: parent.to_path_buf(),
        message: err.to_string(),
    })?;
    let dir =
        Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| CatalogError::Io {
            path: parent.to_path_buf(),
            message: err.to_string(),
        })?;
    dir.write(file_name, rendered)
        .map_err(|err| CatalogError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}
