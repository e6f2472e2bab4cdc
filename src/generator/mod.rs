//! Generator: loads workbooks into a table catalog.
//!
//! A fixed pool of worker threads drains a shared queue of inputs. Each
//! worker handles one workbook end to end (relation sheet, then every table
//! sheet) and appends its tables, relations and errors to a catalog guarded
//! by a single mutex. Once every worker is done, relations are attached to
//! their source tables and the tables are sorted by name.
//!
//! Failures never stop sibling work: a workbook that cannot be opened only
//! loses that workbook, a bad sheet only loses that sheet.

mod error;
mod rows;

pub use error::{CellError, GenerateError, GenerateResult};
pub use rows::{ConvertedRow, RowConverter};

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use tracing::{debug, info, warn};

use crate::schema::{
    attach_relations, is_metadata_sheet, parse_relations, Relation, Table, RELATION_SHEET,
};
use crate::workbook::{open_workbook, Workbook};

/// One unit of work for the pool.
pub enum Input {
    /// A workbook on disk, opened by the worker.
    Path(PathBuf),
    /// An already-open workbook.
    Workbook {
        name: String,
        workbook: Box<dyn Workbook>,
    },
}

impl Input {
    pub fn name(&self) -> String {
        match self {
            Input::Path(path) => path.display().to_string(),
            Input::Workbook { name, .. } => name.clone(),
        }
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Input::Path(path)
    }
}

/// Tables loaded by a run, plus every error encountered on the way.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Sorted by name, relations attached.
    pub tables: Vec<Table>,
    pub errors: Vec<GenerateError>,
}

impl Catalog {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// The tables, or every collected error.
    pub fn into_result(self) -> GenerateResult<Vec<Table>> {
        if self.errors.is_empty() {
            Ok(self.tables)
        } else {
            Err(GenerateError::Failed(self.errors))
        }
    }
}

/// What one workbook contributed.
#[derive(Debug, Default)]
struct WorkbookLoad {
    /// Tables paired with the input they came from.
    tables: Vec<(String, Table)>,
    relations: Vec<Relation>,
    errors: Vec<GenerateError>,
}

/// Parallel workbook loader.
#[derive(Debug, Clone)]
pub struct Generator {
    workers: usize,
}

impl Generator {
    /// Create a generator with `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    /// Load every input into a catalog.
    pub fn run(&self, inputs: Vec<Input>) -> Catalog {
        let pool_size = self.workers.min(inputs.len()).max(1);
        info!(inputs = inputs.len(), workers = pool_size, "loading workbooks");

        let queue = Arc::new(Mutex::new(inputs.into_iter().collect::<VecDeque<_>>()));
        let shared = Arc::new(Mutex::new(WorkbookLoad::default()));

        let handles: Vec<_> = (0..pool_size)
            .map(|worker| {
                let queue = Arc::clone(&queue);
                let shared = Arc::clone(&shared);
                thread::spawn(move || worker_loop(worker, &queue, &shared))
            })
            .collect();

        let mut panicked = 0;
        for handle in handles {
            if handle.join().is_err() {
                panicked += 1;
            }
        }

        let mut load = std::mem::take(&mut *shared.lock().unwrap_or_else(PoisonError::into_inner));
        load.errors
            .extend((0..panicked).map(|_| GenerateError::WorkerPanicked));

        finish(load)
    }

    /// Load workbook files from disk.
    pub fn run_paths(&self, paths: impl IntoIterator<Item = PathBuf>) -> Catalog {
        self.run(paths.into_iter().map(Input::from).collect())
    }
}

fn worker_loop(worker: usize, queue: &Mutex<VecDeque<Input>>, shared: &Mutex<WorkbookLoad>) {
    loop {
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let Some(input) = next else {
            break;
        };

        let name = input.name();
        debug!(worker, input = %name, "processing workbook");
        let load = load_input(input);

        let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.tables.extend(load.tables);
        shared.relations.extend(load.relations);
        shared.errors.extend(load.errors);
    }
}

fn load_input(input: Input) -> WorkbookLoad {
    match input {
        Input::Path(path) => {
            let name = path.display().to_string();
            match open_workbook(&path) {
                Ok(workbook) => load_workbook(&name, workbook.as_ref()),
                Err(source) => {
                    warn!(input = %name, error = %source, "failed to open workbook");
                    WorkbookLoad {
                        errors: vec![GenerateError::Workbook {
                            input: name,
                            source,
                        }],
                        ..WorkbookLoad::default()
                    }
                }
            }
        }
        Input::Workbook { name, workbook } => load_workbook(&name, workbook.as_ref()),
    }
}

/// Parse the relation sheet (if any) and every table sheet of a workbook.
fn load_workbook(input: &str, workbook: &dyn Workbook) -> WorkbookLoad {
    let mut load = WorkbookLoad::default();
    let sheets = workbook.sheet_names();

    if sheets.iter().any(|s| s == RELATION_SHEET) {
        match workbook.rows(RELATION_SHEET) {
            Ok(rows) => match parse_relations(&rows) {
                Ok(relations) => {
                    debug!(input, relations = relations.len(), "parsed relations");
                    load.relations = relations;
                }
                Err(source) => load.errors.push(GenerateError::Relation {
                    input: input.to_string(),
                    source,
                }),
            },
            Err(source) => load.errors.push(GenerateError::Workbook {
                input: input.to_string(),
                source,
            }),
        }
    }

    for sheet in sheets.iter().filter(|s| !is_metadata_sheet(s)) {
        let rows = match workbook.rows(sheet) {
            Ok(rows) => rows,
            Err(source) => {
                load.errors.push(GenerateError::Workbook {
                    input: input.to_string(),
                    source,
                });
                continue;
            }
        };

        match Table::from_sheet(sheet, &rows) {
            Ok(table) => {
                info!(
                    input,
                    table = %table.name,
                    columns = table.columns.len(),
                    rows = table.rows.len(),
                    "loaded table"
                );
                load.tables.push((input.to_string(), table));
            }
            Err(source) => {
                warn!(input, sheet = %sheet, error = %source, "sheet rejected");
                load.errors.push(GenerateError::Sheet {
                    input: input.to_string(),
                    sheet: sheet.clone(),
                    source,
                });
            }
        }
    }

    load
}

/// Sort, drop duplicate table names and attach relations.
fn finish(load: WorkbookLoad) -> Catalog {
    let WorkbookLoad {
        mut tables,
        relations,
        mut errors,
    } = load;

    tables.sort_by(|(ia, a), (ib, b)| {
        (&a.name, ia, &a.sheet_name).cmp(&(&b.name, ib, &b.sheet_name))
    });

    let mut kept: Vec<(String, Table)> = Vec::with_capacity(tables.len());
    for (input, table) in tables {
        match kept.last() {
            Some((first_input, first)) if first.name == table.name => {
                errors.push(GenerateError::DuplicateTable {
                    input,
                    sheet: table.sheet_name,
                    table: table.name,
                    first: format!("{} sheet '{}'", first_input, first.sheet_name),
                });
            }
            _ => kept.push((input, table)),
        }
    }

    let mut tables: Vec<Table> = kept.into_iter().map(|(_, t)| t).collect();
    attach_relations(&mut tables, relations);

    Catalog { tables, errors }
}
