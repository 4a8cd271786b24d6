mod helpers;

mod basic_perturbation;
