/*!
# Data types module
Contains the shared data types that flow between discovery, the runner, and the writers.
*/

/// The unit of work handed to the conversion runner and its outcome
pub mod conversion_task;
