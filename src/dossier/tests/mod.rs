//! Unit and service tests for dossier lifecycle management.
