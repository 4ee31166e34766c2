pub mod experiment_grid;
