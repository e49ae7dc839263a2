pub mod time_recorder;
