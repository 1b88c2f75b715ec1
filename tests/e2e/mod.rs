// End-to-end tests for the AI Chat Backend HTTP API
//
// Each test starts the real router on an ephemeral port with its own
// temporary storage directory. The generation, speech and language
// detection services are replaced by in-process fakes (see helpers/fakes.rs)
// so failure modes can be forced per test.

mod test_chat;
