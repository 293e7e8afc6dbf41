//! Unit tests for transfer planning and execution.
