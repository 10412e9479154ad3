//! XOR driver demo: composes layers into a pipeline, wires them, and runs
//! the per-example cycle the engine expects (reset, inject, forward pass
//! layer by layer, backward shifts output-first, then apply).

use neurite::{ActivationFunction, LayerConfig, LayerRole, NetResult, Network, Sgd, SquaredError};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> NetResult<()> {
    let mut net = Network::new();
    let input = net.add_layer(&LayerConfig::new(
        LayerRole::Input,
        2,
        ActivationFunction::Linear,
    ))?;
    let hidden = net.add_layer(&LayerConfig::new(
        LayerRole::Standard,
        3,
        ActivationFunction::Sigmoid,
    ))?;
    let output = net.add_layer(&LayerConfig::new(
        LayerRole::Output,
        1,
        ActivationFunction::Linear,
    ))?;

    let mut rng = StdRng::seed_from_u64(42);
    net.connect_fully_with(input, hidden, &mut rng);
    net.connect_fully_with(hidden, output, &mut rng);
    // the wiring default of [-5, 5] is rough for gradient descent; start small
    net.randomize_weights_with(input, 1.0, &mut rng);
    net.randomize_weights_with(hidden, 1.0, &mut rng);

    let layers = [input, hidden, output];
    let samples = [
        ([1.0, 0.0], [1.0]),
        ([1.0, 1.0], [0.0]),
        ([0.0, 1.0], [1.0]),
        ([0.0, 0.0], [0.0]),
    ];

    let optimizer = Sgd::new(0.3);
    let epochs = 8000;

    for epoch in 0..epochs {
        let mut epoch_loss = 0.0;
        for (x, t) in &samples {
            for layer in layers {
                net.reset_layer(layer);
            }
            net.set_inputs(input, x)?;
            for layer in layers {
                net.forward_pass(layer);
            }
            epoch_loss += SquaredError::loss(&net.outputs(output), t);

            let out_shifts = net.backward_shifts(output, t)?;
            let hid_shifts = net.backward_shifts(hidden, t)?;
            optimizer.step(&mut net, output, &out_shifts)?;
            optimizer.step(&mut net, hidden, &hid_shifts)?;
        }
        if epoch % 1000 == 0 {
            println!("Epoch {epoch}: loss = {epoch_loss:.6}");
        }
    }

    for (x, _) in &samples {
        for layer in layers {
            net.reset_layer(layer);
        }
        net.set_inputs(input, x)?;
        for layer in layers {
            net.forward_pass(layer);
        }
        println!("Input: {:?} -> Output: {:.4}", x, net.outputs(output)[0]);
    }

    Ok(())
}
