//! Database record models matching table schemas.
//!
//! Request types (`*CreateDBRequest`, `*UpdateDBRequest`) carry what a repository writes, response
//! types (`*DBResponse`) carry what it reads back. Column names in the schema are French
//! (`nom`, `prenom`, `id_palanque`, ...); the models use English field names and the mapping lives
//! in the repositories.
//!
//! - [`divers`]: divers (`db_plongeur`)
//! - [`aptitudes`]: diver qualifications (`db_aptitude`) and their column encoding
//! - [`dive_groups`]: the dive group aggregate whose divers are synced together

pub mod aptitudes;
pub mod dive_groups;
pub mod divers;
