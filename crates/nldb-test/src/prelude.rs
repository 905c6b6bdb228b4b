//! Convenience re-exports for test modules.

pub use crate::fixtures::{
    test_column_unit, test_expired_session, test_relationship, test_saved_connection,
    test_session, test_table_unit, test_turn, test_user,
};
pub use crate::harness::TestHarness;
pub use crate::mock_llm::{MockEmbedder, MockLlmProvider, ScriptedReply};
pub use crate::mocks::{RecordingDriver, RecordingDriverFactory};
