//! File actions module.
//!
//! Currently a single action: permanent removal of confirmed duplicates.
//!
//! ```no_run
//! use dupefind::actions::{execute_deletion, DeletionReport};
//! use dupefind::operator::ScriptedOperator;
//! use dupefind::selection::DeletionRequest;
//! use std::path::PathBuf;
//!
//! let request: DeletionRequest = vec![PathBuf::from("/tmp/copy.txt")].into_iter().collect();
//! let mut operator = ScriptedOperator::new().with_confirmation("y");
//! if let Ok(DeletionReport::Completed(batch)) = execute_deletion(&request, &mut operator) {
//!     println!("{}", batch.summary());
//! }
//! ```

pub mod delete;

pub use delete::{
    delete_batch, execute_deletion, is_affirmative, remove_file, BatchDeleteResult,
    DeleteError, DeleteOutcome, DeleteProgressCallback, DeleteResult, DeletionReport,
};
